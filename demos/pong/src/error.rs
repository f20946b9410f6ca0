//! Error types for the pong demo

use thiserror::Error;

/// Demo error type
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid RON for `PongConfig`
    #[error("Config parse error: {0}")]
    Parse(String),

    /// The configuration parsed but cannot drive a game
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A timeline rejected a write
    #[error("Timeline error: {0}")]
    Timeline(#[from] tube_core::Error),
}

/// Result type for demo operations
pub type Result<T> = std::result::Result<T, Error>;
