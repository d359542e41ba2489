//! Error types for dataset access.

use thiserror::Error;

/// Errors that can occur while opening a store or reading from it.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Failed to construct or reach the backing storage.
    #[error("storage error: {0}")]
    Storage(String),

    /// Failed to read array data.
    #[error("failed to read array data: {0}")]
    ReadFailed(String),

    /// None of the expected coordinate array names exist in the store.
    #[error("store has no coordinate array named {0}")]
    MissingCoordinate(String),

    /// A required attribute is absent.
    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    /// The requested variable does not exist in the store.
    #[error("variable '{name}' not found in store: {detail}")]
    VariableNotFound { name: String, detail: String },

    /// The array layout is not one this reader understands.
    #[error("unsupported array layout: {0}")]
    UnsupportedLayout(String),

    /// The array element type is not one this reader understands.
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// The time coordinate could not be decoded.
    #[error("time coordinate error: {0}")]
    Time(#[from] dash_common::TimeParseError),
}

impl DatasetError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    pub fn unsupported_layout(msg: impl Into<String>) -> Self {
        Self::UnsupportedLayout(msg.into())
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
