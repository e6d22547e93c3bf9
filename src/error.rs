use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: need {needed} bars, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl EngineError {
    /// Build an `InsufficientData` error for a windowed computation.
    pub fn insufficient(needed: usize, got: usize) -> Self {
        EngineError::InsufficientData { needed, got }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
