//! Configuration errors

/// Errors that can occur while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid orchestrator options: {0}")]
    InvalidOptions(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
