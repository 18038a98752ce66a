//! Core error types.

use thiserror::Error;

/// Errors from enum registration, lookups and transition checks.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("value not found: {enum_name} has no member with value {value}")]
    ValueNotFound { enum_name: String, value: i64 },

    #[error("name not found: {enum_name} has no member named '{name}'")]
    NameNotFound { enum_name: String, name: String },

    #[error("transition not found: {enum_name} has no transitions into {value}")]
    TransitionNotFound { enum_name: String, value: i64 },

    #[error("transitions undefined: {enum_name} declares no transition table")]
    TransitionsUndefined { enum_name: String },

    #[error("duplicate value in {enum_name}: '{first}' and '{second}' both use {value}")]
    DuplicateValue {
        enum_name: String,
        value: i64,
        first: String,
        second: String,
    },

    #[error("duplicate name in {enum_name}: '{name}'")]
    DuplicateName { enum_name: String, name: String },

    #[error("invalid enum definition {enum_name}: {reason}")]
    InvalidDefinition { enum_name: String, reason: String },

    #[error("enum not found: {name}")]
    EnumNotFound { name: String },

    #[error("enum already registered: {name}")]
    EnumExists { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Returns whether this error is a failed lookup rather than a bad definition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ValueNotFound { .. }
                | CoreError::NameNotFound { .. }
                | CoreError::TransitionNotFound { .. }
                | CoreError::TransitionsUndefined { .. }
                | CoreError::EnumNotFound { .. }
        )
    }

    /// Returns a stable error code for callers that report errors outward.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::ValueNotFound { .. } => "VALUE_NOT_FOUND",
            CoreError::NameNotFound { .. } => "NAME_NOT_FOUND",
            CoreError::TransitionNotFound { .. } => "TRANSITION_NOT_FOUND",
            CoreError::TransitionsUndefined { .. } => "TRANSITION_NOT_FOUND",
            CoreError::DuplicateValue { .. } => "DUPLICATE_VALUE",
            CoreError::DuplicateName { .. } => "DUPLICATE_NAME",
            CoreError::InvalidDefinition { .. } => "INVALID_DEFINITION",
            CoreError::EnumNotFound { .. } => "ENUM_NOT_FOUND",
            CoreError::EnumExists { .. } => "ENUM_EXISTS",
            CoreError::Io(_) => "IO_ERROR",
            CoreError::Json(_) => "BAD_REQUEST",
            CoreError::Yaml(_) => "BAD_REQUEST",
        }
    }
}
