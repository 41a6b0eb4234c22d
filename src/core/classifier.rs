use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::core::transport::Transport;
use crate::extractors::oembed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    YouTube,
    Vimeo,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::YouTube, Provider::Vimeo];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::YouTube => "YouTube",
            Provider::Vimeo => "Vimeo",
        }
    }

    pub fn rules(&self) -> &'static [ProviderRule] {
        match self {
            Provider::YouTube => &YOUTUBE_RULES,
            Provider::Vimeo => &VIMEO_RULES,
        }
    }

    /// Whether any of this provider's rules claims the URL.
    pub fn matches(&self, url: &str) -> bool {
        self.rules().iter().any(|rule| url.contains(rule.match_substring))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One URL shape: a literal the URL must contain, and the pattern that
/// captures the id from it.
#[derive(Debug)]
pub struct ProviderRule {
    pub match_substring: &'static str,
    pub id_pattern: Regex,
}

impl ProviderRule {
    fn new(match_substring: &'static str, id_pattern: &str) -> Self {
        Self {
            match_substring,
            id_pattern: Regex::new(id_pattern).expect("provider id pattern must compile"),
        }
    }

    fn capture<'a>(&self, url: &'a str) -> Option<&'a str> {
        if !url.contains(self.match_substring) {
            return None;
        }
        self.id_pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }
}

static YOUTUBE_RULES: Lazy<Vec<ProviderRule>> = Lazy::new(|| {
    vec![
        ProviderRule::new("https://www.youtube.com/watch?v=", r"v=([-A-Za-z0-9_]+)"),
        ProviderRule::new("https://youtu.be/", r"youtu\.be/([-A-Za-z0-9_]+)"),
        ProviderRule::new("youtube.com/shorts/", r"shorts/([-A-Za-z0-9_]+)"),
        ProviderRule::new("youtube.com/live/", r"live/([A-Za-z0-9_]+)"),
    ]
});

static VIMEO_RULES: Lazy<Vec<ProviderRule>> =
    Lazy::new(|| vec![ProviderRule::new("https://vimeo.com/", r"vimeo\.com/([A-Za-z0-9_]+)")]);

static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("numeric id pattern"));

/// First provider in declaration order with a matching rule.
pub fn classify(url: &str) -> Option<Provider> {
    Provider::ALL.into_iter().find(|provider| provider.matches(url))
}

/// An id captured from the URL text alone, before any network lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub provider: Provider,
    pub id: String,
}

impl Candidate {
    /// Vimeo vanity paths (`vimeo.com/channels`, `vimeo.com/someuser`...)
    /// capture a word rather than the numeric video id.
    pub fn needs_lookup(&self) -> bool {
        self.provider == Provider::Vimeo && !NUMERIC_ID.is_match(&self.id)
    }
}

/// Applies every provider's rules in declared order. Rules are not mutually
/// exclusive: a later capture overwrites an earlier one.
pub fn candidate_id(url: &str) -> Option<Candidate> {
    let mut candidate = None;
    for provider in Provider::ALL {
        for rule in provider.rules() {
            if let Some(id) = rule.capture(url) {
                candidate = Some(Candidate {
                    provider,
                    id: id.to_string(),
                });
            }
        }
    }
    candidate
}

/// Canonical video id for the URL, or an empty string. Non-numeric Vimeo
/// captures are resolved through Vimeo's oEmbed `video_id` field.
pub async fn extract_id(url: &str, transport: &dyn Transport) -> String {
    match candidate_id(url) {
        Some(candidate) if candidate.needs_lookup() => {
            tracing::debug!("Vimeo capture {:?} is not numeric, asking oEmbed", candidate.id);
            oembed::fetch_vimeo_video_id(transport, url).await
        }
        Some(candidate) => candidate.id,
        None => String::new(),
    }
}
