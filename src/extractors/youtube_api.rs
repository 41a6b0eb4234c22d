//! YouTube Data API v3, used when the public oEmbed endpoint refuses a video
//! (private embeds, age gates, regional blocks).

use serde::Deserialize;

use crate::core::error::ResolveError;
use crate::core::transport::{HttpResponse, Transport};

pub const DATA_API_BASE: &str = "https://youtube.googleapis.com/youtube/v3";

/// Author link used until the channel lookup supplies a real one.
pub const PLACEHOLDER_AUTHOR_URL: &str = "javascript:void(0)";

pub fn videos_endpoint(video_id: &str, key: &str) -> String {
    format!("{}/videos?part=snippet&id={}&key={}", DATA_API_BASE, video_id, key)
}

pub fn channels_endpoint(channel_id: &str, key: &str) -> String {
    format!("{}/channels?part=snippet&id={}&key={}", DATA_API_BASE, channel_id, key)
}

pub fn channel_url(custom_url: &str) -> String {
    format!("https://www.youtube.com/{}", custom_url)
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Item<T>>,
}

#[derive(Debug, Deserialize)]
struct Item<T> {
    snippet: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub custom_url: Option<String>,
}

pub struct DataApiClient<'a> {
    transport: &'a dyn Transport,
    key: &'a str,
}

impl<'a> DataApiClient<'a> {
    pub fn new(transport: &'a dyn Transport, key: &'a str) -> Self {
        Self { transport, key }
    }

    /// Logs never carry the API key.
    fn redact(&self, request_url: &str) -> String {
        if self.key.is_empty() {
            return request_url.to_string();
        }
        request_url.replace(self.key, "<redacted>")
    }

    async fn first_snippet<T>(&self, request_url: String) -> Result<Option<T>, ResolveError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let loggable = self.redact(&request_url);
        tracing::debug!("Querying YouTube Data API: {}", loggable);

        let response: HttpResponse = self.transport.get(&request_url).await.map_err(|mut e| {
            e.url = loggable.clone();
            e.message = self.redact(&e.message);
            e
        })?;

        if !response.is_success() {
            tracing::debug!("YouTube Data API returned HTTP {} for {}", response.status, loggable);
            return Ok(None);
        }

        let list: ListResponse<T> = response.json().map_err(|source| ResolveError::Decode {
            endpoint: loggable.clone(),
            source,
        })?;

        Ok(list.items.into_iter().next().map(|item| item.snippet))
    }

    /// `Ok(None)` when the API answers with an error status or no items.
    pub async fn video_snippet(&self, video_id: &str) -> Result<Option<VideoSnippet>, ResolveError> {
        self.first_snippet(videos_endpoint(video_id, self.key)).await
    }

    /// The channel's public URL, or `None` when it has no custom URL or the
    /// lookup is refused.
    pub async fn channel_url(&self, channel_id: &str) -> Result<Option<String>, ResolveError> {
        let snippet: Option<ChannelSnippet> =
            self.first_snippet(channels_endpoint(channel_id, self.key)).await?;

        Ok(snippet
            .and_then(|s| s.custom_url)
            .filter(|custom| !custom.is_empty())
            .map(|custom| channel_url(&custom)))
    }
}
