//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to create window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Platform not available (e.g. no display connection)
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Operation not supported by this backend
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// The platform window was already destroyed
    #[error("Platform window has been destroyed")]
    WindowDestroyed,

    /// Invalid window configuration file
    #[error("Invalid window configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to read a configuration file
    #[error("Failed to read window configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
