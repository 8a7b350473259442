//! Error taxonomy for the import pipeline
//!
//! Collaborator traits (catalog, validator, settings) keep returning
//! `anyhow::Result`; this enum covers what the pipeline itself can raise.

use thiserror::Error;

/// Errors raised while normalizing or fetching registry data
#[derive(Debug, Error)]
pub enum ImportError {
    /// Blank URL, malformed single-record payload, etc.
    #[error("{0}")]
    InvalidArgument(String),

    /// `import_type` is not one of `file`, `json`, `url`
    #[error("Unsupported import type: {0}")]
    UnsupportedSourceKind(String),

    /// Registry endpoint answered outside 200-299
    #[error("HTTP {status} when fetching {url}")]
    HttpStatus { status: u16, url: String },

    /// Payload or response body is not readable JSON
    #[error("Failed to parse {context}: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Connection failure, timeout or body read failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client could not be constructed from the configuration
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Remote URL passed validation but could not be decomposed
    #[error("Invalid URL: {url}")]
    RemoteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ImportError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn parse(context: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { context, source }
    }
}

/// Result alias for pipeline operations
pub type Result<T, E = ImportError> = std::result::Result<T, E>;
