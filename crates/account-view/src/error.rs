//! View error types.

use thiserror::Error;

/// Errors raised while rendering templates or touching the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// No template installed under this name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A placeholder had no value in the render context.
    #[error("Template {template} references missing key: {key}")]
    MissingContext { template: String, key: String },

    /// A placeholder was opened but never closed.
    #[error("Template {template} has an unterminated placeholder")]
    Unterminated { template: String },

    /// Nothing in the document matched the selector.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Selector string is not `#id` or `.class`.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
