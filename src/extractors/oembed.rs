//! oEmbed endpoints (<https://oembed.com/>) for the supported providers.
//!
//! The page URL is substituted into the query string as-is; both providers
//! accept it unencoded.

use serde::Deserialize;
use serde_json::Value;

use crate::core::classifier::Provider;
use crate::core::transport::Transport;

pub fn endpoint(provider: Provider, url: &str) -> String {
    match provider {
        Provider::YouTube => format!("https://www.youtube.com/oembed?format=json&url={}", url),
        Provider::Vimeo => format!("https://vimeo.com/api/oembed.json?url={}", url),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OEmbedResponse {
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// The one field read when only the id is wanted; Vimeo sends a number.
#[derive(Debug, Deserialize)]
struct VideoIdOnly {
    #[serde(default)]
    video_id: Option<Value>,
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Reads the numeric id Vimeo reports for a vanity URL. Every failure,
/// including a transport error, yields an empty string.
pub async fn fetch_vimeo_video_id(transport: &dyn Transport, url: &str) -> String {
    let request_url = endpoint(Provider::Vimeo, url);

    let response = match transport.get(&request_url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Vimeo id lookup failed: {}", e);
            return String::new();
        }
    };

    if !response.is_success() {
        tracing::debug!("Vimeo id lookup returned HTTP {}", response.status);
        return String::new();
    }

    match response.json::<VideoIdOnly>() {
        Ok(body) => body.video_id.as_ref().and_then(id_to_string).unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Vimeo id lookup returned a malformed body: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(
            endpoint(Provider::YouTube, "https://youtu.be/abc123"),
            "https://www.youtube.com/oembed?format=json&url=https://youtu.be/abc123"
        );
        assert_eq!(
            endpoint(Provider::Vimeo, "https://vimeo.com/76979871"),
            "https://vimeo.com/api/oembed.json?url=https://vimeo.com/76979871"
        );
    }

    #[test]
    fn test_vimeo_body() {
        let body = r#"{
            "type": "video",
            "provider_name": "Vimeo",
            "title": "The New Vimeo Player (You Know, For Videos)",
            "author_name": "Vimeo",
            "author_url": "https://vimeo.com/staff",
            "thumbnail_url": "https://i.vimeocdn.com/video/452001751-640.jpg",
            "video_id": 76979871
        }"#;

        let parsed: OEmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.author_name, "Vimeo");

        let id: VideoIdOnly = serde_json::from_str(body).unwrap();
        assert_eq!(id.video_id.as_ref().and_then(id_to_string).as_deref(), Some("76979871"));
        assert!(parsed.thumbnail_url.is_some());
    }

    #[test]
    fn test_youtube_body_without_optional_fields() {
        let parsed: OEmbedResponse =
            serde_json::from_str(r#"{"title":"T","author_name":"A"}"#).unwrap();
        assert_eq!(parsed.author_url, "");

        assert!(serde_json::from_str::<OEmbedResponse>(r#"{"author_name":"A"}"#).is_err());
    }
}
