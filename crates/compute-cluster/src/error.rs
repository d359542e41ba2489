use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to start local worker pool: {0}")]
    Spawn(String),

    #[error("batch job submission failed: {0}")]
    Submit(String),

    #[error("cluster gateway request failed: {0}")]
    Gateway(String),
}

impl ClusterError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    pub fn submit(msg: impl Into<String>) -> Self {
        Self::Submit(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;
