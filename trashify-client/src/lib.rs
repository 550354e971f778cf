//! Provider implementation for the Trashify backend's trash-in-distance endpoint.

/// Environment-driven settings for the HTTP client.
pub mod config;
/// Proximity search over HTTP.
pub mod search;
/// Bearer token sources.
pub mod token;

pub use config::{ClientConfig, http_client};
pub use search::{ProximitySearchClient, decode_response};
pub use token::{EnvTokenProvider, StaticToken};
