//! Typed enums declared in code.
//!
//! A type implementing [`Enum`] exposes one process-wide definition and gets
//! every lookup as an associated function. Use the [`enumfield!`](crate::enumfield)
//! macro to declare one.

use crate::definition::EnumDefinition;
use crate::error::CoreError;
use crate::label::LazyLabel;
use crate::value::{EnumValue, Identifier};
use std::collections::BTreeSet;

pub trait Enum {
    /// The definition, built on first access and immutable afterwards.
    fn definition() -> &'static EnumDefinition;

    fn get<'a>(identifier: impl Into<Identifier<'a>>) -> Option<&'static EnumValue> {
        Self::definition().get(identifier)
    }

    fn try_get<'a>(identifier: impl Into<Identifier<'a>>) -> Result<&'static EnumValue, CoreError> {
        Self::definition().try_get(identifier)
    }

    fn name(value: i64) -> Result<&'static str, CoreError> {
        Self::definition().name(value)
    }

    fn label(value: i64) -> Result<LazyLabel, CoreError> {
        Self::definition().label(value)
    }

    fn items() -> Vec<(&'static str, i64)> {
        Self::definition().items()
    }

    fn choices() -> Vec<(i64, &'static EnumValue)> {
        Self::definition().choices()
    }

    /// Smallest value unless the declaration names a default.
    fn default() -> i64 {
        Self::definition().default()
    }

    fn is_valid_transition(from: i64, to: i64) -> bool {
        Self::definition().is_valid_transition(from, to)
    }

    fn transition_origins(to: i64) -> Result<&'static BTreeSet<i64>, CoreError> {
        Self::definition().transition_origins(to)
    }
}
