use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelsmithError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Sequencing failed for reel {reel}: no valid strip within {attempts} attempts")]
    Sequencing { reel: usize, attempts: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Progress sink closed")]
    SinkClosed,
}

pub type Result<T> = std::result::Result<T, ReelsmithError>;
