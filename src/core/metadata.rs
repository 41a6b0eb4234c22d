use serde::{Deserialize, Serialize};

/// Display metadata for one video link. Built once by the resolver and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    pub author: String,
    pub author_url: String,
    pub found: bool,
    pub network_error: bool,
}

/// The fields a successful lookup fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub title: String,
    pub author: String,
    pub author_url: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Found,
    NotFound,
    /// The provider could not be reached; the video may well exist.
    Unavailable,
}

impl VideoInfo {
    pub fn not_found(url: &str) -> Self {
        Self {
            url: url.to_string(),
            thumbnail: String::new(),
            title: String::new(),
            author: String::new(),
            author_url: String::new(),
            found: false,
            network_error: false,
        }
    }

    pub fn network_error(url: &str) -> Self {
        Self {
            network_error: true,
            ..Self::not_found(url)
        }
    }

    pub fn found(url: &str, details: VideoDetails) -> Self {
        Self {
            url: url.to_string(),
            thumbnail: details.thumbnail,
            title: details.title,
            author: details.author,
            author_url: details.author_url,
            found: true,
            network_error: false,
        }
    }

    pub fn availability(&self) -> Availability {
        if self.found {
            Availability::Found
        } else if self.network_error {
            Availability::Unavailable
        } else {
            Availability::NotFound
        }
    }
}
