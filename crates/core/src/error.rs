use thiserror::Error;

/// Errors that can occur while configuring agents or loading games
#[derive(Error, Debug, PartialEq)]
pub enum MultiAgentError {
    #[error("Unknown evaluation function: {0}")]
    UnknownEvaluationFunction(String),

    #[error("Unknown search strategy: {0}")]
    UnknownStrategy(String),

    #[error("Search depth must be at least 1, got {0}")]
    InvalidDepth(usize),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Convenience Result type for multi-agent operations
pub type Result<T> = std::result::Result<T, MultiAgentError>;
