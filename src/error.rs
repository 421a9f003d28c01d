//! Error types for the tasktmpl CLI and file loading.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Template failures themselves are described by [`crate::template::ExpandError`];
//! this type is what the CLI reports once it decides a failure is fatal.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for tasktmpl operations.
#[derive(Error, Debug)]
pub enum TasktmplError {
    /// Bad arguments, or an unreadable or invalid input file.
    #[error("{0}")]
    UserError(String),

    /// A template could not be expanded and the config treats that as fatal.
    #[error("Template expansion failed: {0}")]
    TemplateError(String),
}

impl TasktmplError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TasktmplError::UserError(_) => exit_codes::USER_ERROR,
            TasktmplError::TemplateError(_) => exit_codes::TEMPLATE_FAILURE,
        }
    }
}

/// Result type alias for tasktmpl operations.
pub type Result<T> = std::result::Result<T, TasktmplError>;
