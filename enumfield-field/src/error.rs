//! Field error types.

use enumfield_core::CoreError;
use thiserror::Error;

/// Errors from field configuration and value validation.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid choice for {enum_name}: {value}")]
    InvalidChoice { enum_name: String, value: String },

    #[error("invalid transition for {enum_name}: {from} -> {to}")]
    InvalidTransition {
        enum_name: String,
        from: String,
        to: String,
    },

    #[error("invalid default for {enum_name}: {default}")]
    InvalidDefault { enum_name: String, default: String },

    #[error("field option '{0}' is set from the enum and cannot be overridden")]
    ReservedOption(String),

    #[error("null value for non-nullable {enum_name} field")]
    NullNotAllowed { enum_name: String },
}

impl FieldError {
    /// Returns a stable error code for callers that report errors outward.
    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::Core(e) => e.error_code(),
            FieldError::InvalidChoice { .. } => "INVALID_CHOICE",
            FieldError::InvalidTransition { .. } => "INVALID_TRANSITION",
            FieldError::InvalidDefault { .. } => "INVALID_DEFAULT",
            FieldError::ReservedOption(_) => "BAD_REQUEST",
            FieldError::NullNotAllowed { .. } => "NULL_NOT_ALLOWED",
        }
    }
}
