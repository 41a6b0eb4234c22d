pub mod oembed;
pub mod youtube_api;

pub use oembed::OEmbedResponse;
pub use youtube_api::DataApiClient;
