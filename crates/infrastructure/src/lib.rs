//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod eca_api_client;
mod http_collection_source;
mod http_session_source;

pub use eca_api_client::EcaApiClient;
pub use http_collection_source::HttpCollectionSource;
pub use http_session_source::HttpSessionSource;
