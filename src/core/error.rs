use thiserror::Error;

use crate::core::transport::TransportError;

/// Failures inside a single resolution. `Resolver::resolve` folds these into
/// `VideoInfo` fields, so they never reach the caller.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {endpoint} has no {field}")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
}

impl ResolveError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
