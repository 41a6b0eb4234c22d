pub mod classifier;
pub mod document;
pub mod error;
pub mod metadata;
pub mod resolver;
pub mod transport;

pub use classifier::{classify, extract_id, Provider};
pub use error::ResolveError;
pub use metadata::{Availability, VideoDetails, VideoInfo};
pub use resolver::Resolver;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
