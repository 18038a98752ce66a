//! # enumfield-field
//!
//! Adapter between enumfield enums and an external model/field system.
//!
//! This crate provides:
//! - `FieldConfig`, the serializable field description (choices, default,
//!   caller options)
//! - Storage conversions and assignment validation
//! - `TrackedValue`, which checks a field's pending value against the
//!   persisted one using the enum's transition table

pub mod error;
pub mod field;
pub mod tracked;

pub use error::FieldError;
pub use field::{Choice, EnumField, FieldConfig};
pub use tracked::TrackedValue;
