//! Error types for maestro-llm

use thiserror::Error;

/// Text-generation backend error type
#[derive(Debug, Error)]
pub enum Error {
    /// Backend not configured (missing credential)
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// API returned an error payload
    #[error("api error: {0}")]
    Api(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
