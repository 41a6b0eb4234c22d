use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::core::classifier::{self, Provider};
use crate::core::error::ResolveError;
use crate::core::metadata::{VideoDetails, VideoInfo};
use crate::core::transport::{ReqwestTransport, Transport};
use crate::extractors::oembed::{self, OEmbedResponse};
use crate::extractors::youtube_api::{DataApiClient, PLACEHOLDER_AUTHOR_URL};

/// Turns a video link into display metadata. Holds no per-call state, so one
/// resolver can serve any number of concurrent resolutions.
#[derive(Clone)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
}

/// What the metadata endpoints said, before the thumbnail is settled.
struct Listing {
    title: String,
    author: String,
    author_url: String,
    oembed_thumbnail: Option<String>,
}

impl Resolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(config)?)))
    }

    pub async fn video_id(&self, url: &str) -> String {
        classifier::extract_id(url, self.transport.as_ref()).await
    }

    /// Never fails: every error ends up in the returned `VideoInfo`.
    pub async fn resolve(&self, url: &str, config: &Config) -> VideoInfo {
        let Some(provider) = classifier::classify(url) else {
            debug!("No provider claims {}", url);
            return VideoInfo::not_found(url);
        };

        match self.lookup(url, provider, config.youtube_api_key()).await {
            Ok(Some(details)) => VideoInfo::found(url, details),
            Ok(None) => VideoInfo::not_found(url),
            Err(e) if e.is_transport() => {
                error!("Network error while resolving {}: {}", url, e);
                VideoInfo::network_error(url)
            }
            Err(e) => {
                warn!("Could not resolve {}: {}", url, e);
                VideoInfo::not_found(url)
            }
        }
    }

    async fn lookup(
        &self,
        url: &str,
        provider: Provider,
        api_key: Option<&str>,
    ) -> Result<Option<VideoDetails>, ResolveError> {
        let listing = match self.oembed_listing(url, provider).await? {
            Some(listing) => Some(listing),
            None => match (provider, api_key) {
                (Provider::YouTube, Some(key)) => self.data_api_listing(url, key).await?,
                _ => None,
            },
        };

        let Some(listing) = listing else {
            return Ok(None);
        };

        if listing.title.is_empty() || listing.author.is_empty() {
            debug!("{} listing for {} is missing title or author", provider, url);
            return Ok(None);
        }

        let thumbnail = match provider {
            // oEmbed thumbnails for YouTube are often letterboxed; the direct
            // image is always 16:9.
            Provider::YouTube => {
                let id = self.video_id(url).await;
                if id.is_empty() {
                    debug!("No YouTube id in {}", url);
                    return Ok(None);
                }
                format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id)
            }
            Provider::Vimeo => match listing.oembed_thumbnail.filter(|t| !t.is_empty()) {
                Some(thumbnail) => thumbnail,
                None => {
                    return Err(ResolveError::MissingField {
                        endpoint: oembed::endpoint(provider, url),
                        field: "thumbnail_url",
                    })
                }
            },
        };

        Ok(Some(VideoDetails {
            title: listing.title,
            author: listing.author,
            author_url: listing.author_url,
            thumbnail,
        }))
    }

    async fn oembed_listing(&self, url: &str, provider: Provider) -> Result<Option<Listing>, ResolveError> {
        let endpoint = oembed::endpoint(provider, url);
        debug!("Fetching oEmbed: {}", endpoint);

        let response = self.transport.get(&endpoint).await?;
        if !response.is_success() {
            debug!("oEmbed returned HTTP {} for {}", response.status, url);
            return Ok(None);
        }

        let body: OEmbedResponse = response
            .json()
            .map_err(|source| ResolveError::Decode { endpoint, source })?;

        Ok(Some(Listing {
            title: body.title,
            author: body.author_name,
            author_url: body.author_url,
            oembed_thumbnail: body.thumbnail_url,
        }))
    }

    /// Video snippet, then channel snippet. The channel lookup only improves the
    /// author link; its refusal does not fail the resolution.
    async fn data_api_listing(&self, url: &str, key: &str) -> Result<Option<Listing>, ResolveError> {
        let video_id = self.video_id(url).await;
        if video_id.is_empty() {
            debug!("No YouTube id in {}, skipping Data API", url);
            return Ok(None);
        }

        let api = DataApiClient::new(self.transport.as_ref(), key);
        let Some(snippet) = api.video_snippet(&video_id).await? else {
            return Ok(None);
        };

        let channel = match api.channel_url(&snippet.channel_id).await {
            Ok(channel) => channel,
            Err(e) if e.is_transport() => return Err(e),
            Err(e) => {
                warn!("Ignoring channel lookup for {}: {}", snippet.channel_id, e);
                None
            }
        };
        let author_url = channel.unwrap_or_else(|| PLACEHOLDER_AUTHOR_URL.to_string());

        Ok(Some(Listing {
            title: snippet.title,
            author: snippet.channel_title,
            author_url,
            oembed_thumbnail: None,
        }))
    }
}
