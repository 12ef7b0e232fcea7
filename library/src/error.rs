use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project error: {0}")]
    Project(String),
    #[error("Frame decode error: {0}")]
    Decode(String),
    #[error("Asset not ready: {0}")]
    AssetNotReady(Uuid),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub fn project(msg: impl Into<String>) -> Self {
        EngineError::Project(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        EngineError::Decode(msg.into())
    }
}
