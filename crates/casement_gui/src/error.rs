//! GUI error types

use casement_platform::PlatformError;
use thiserror::Error;

/// Errors reported by [`Window`](crate::Window) operations
#[derive(Error, Debug)]
pub enum GuiError {
    /// The platform backend failed, e.g. no window could be allocated
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The operation is not valid in the window's current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for GUI operations
pub type Result<T> = std::result::Result<T, GuiError>;
