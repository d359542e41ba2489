//! Error types for catalog access.

use thiserror::Error;

/// Errors that can occur while opening or querying a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to fetch the descriptor or index over HTTP.
    #[error("failed to fetch catalog: {0}")]
    Fetch(String),

    /// The catalog or index URL is not valid.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The JSON descriptor could not be parsed.
    #[error("invalid catalog descriptor: {0}")]
    Descriptor(String),

    /// The CSV index could not be parsed.
    #[error("invalid catalog index: {0}")]
    Index(String),

    /// A query referenced a column the index does not have.
    #[error("catalog has no column named '{0}'")]
    MissingColumn(String),
}

impl CatalogError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn descriptor(msg: impl Into<String>) -> Self {
        Self::Descriptor(msg.into())
    }

    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
