//! Error types for fwprov-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty source")]
    EmptySource,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("a release version is required for remote sources")]
    MissingVersion,

    #[error("cannot read '{}': {source}", path.display())]
    LocalRead { path: PathBuf, source: io::Error },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("incomplete transfer from {url}: expected {expected} bytes, received {received}")]
    Incomplete {
        url: String,
        expected: u64,
        received: u64,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// The source itself was unusable: malformed, empty, or a path that can't be read.
    pub fn is_invalid_source(&self) -> bool {
        matches!(
            self,
            Self::EmptySource | Self::InvalidUrl { .. } | Self::MissingVersion | Self::LocalRead { .. }
        )
    }

    /// The source was fine but the transfer itself failed.
    pub fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Incomplete { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
