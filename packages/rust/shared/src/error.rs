//! Error types for scormchef.
//!
//! Library crates use [`ChefError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all scormchef operations.
#[derive(Debug, thiserror::Error)]
pub enum ChefError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Course data or content shape error (bad specs, missing inputs).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Image decode, resize, or encode error.
    #[error("image error at {path:?}: {message}")]
    Image { path: PathBuf, message: String },

    /// Zip archive read or write error.
    #[error("archive error: {0}")]
    Archive(String),

    /// HTML patching error (missing or unreadable index page).
    #[error("patch error: {message}")]
    Patch { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ChefError>;

impl ChefError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an image error for a specific file.
    pub fn image(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Image {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a patch error from any displayable message.
    pub fn patch(msg: impl Into<String>) -> Self {
        Self::Patch {
            message: msg.into(),
        }
    }
}
