pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use config::Config;
pub use crate::core::{classify, Availability, Provider, Resolver, VideoInfo};
