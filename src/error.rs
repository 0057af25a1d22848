//! Error taxonomy shared across the search pipeline.

use thiserror::Error;

/// Errors surfaced by the flatten/embed/index/query pipeline.
///
/// Each variant carries a stable, user-visible message so transports can map
/// the kind to a status code without parsing free-form text.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or invalid configuration: credential, locator, record file.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The record set was empty, so no index could be built.
    #[error("no records found: {0}")]
    EmptyInput(String),
    /// The embedding provider rejected the request or broke its contract.
    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),
    /// A record could not be flattened into embeddable text.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
