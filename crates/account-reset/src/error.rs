//! Password reset errors.

use account_fetch::FetchError;
use account_view::ViewError;
use thiserror::Error;

/// Errors produced while driving the password reset form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetError {
    /// The email field failed local validation.
    #[error("validation error: email address was rejected")]
    Validation,

    /// The reset request did not complete with a 2xx status.
    #[error("request error: {0}")]
    Request(#[from] FetchError),

    /// The document is missing an element the form relies on, or a
    /// template could not be rendered.
    #[error("view error: {0}")]
    View(#[from] ViewError),
}

impl ResetError {
    /// User-facing errors are cleared by submitting again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResetError::Validation | ResetError::Request(_))
    }
}

/// Errors loading a [`ResetConfig`](crate::ResetConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse JSON.
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
