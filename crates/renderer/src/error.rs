use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl RenderError {
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
