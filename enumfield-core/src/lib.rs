//! # enumfield-core
//!
//! Enumerated values with transition rules, usable as database-backed model
//! fields.
//!
//! This crate provides:
//! - Enum definitions built by an explicit registration step
//! - Lookups by numeric value or case-insensitive name
//! - Human readable labels routed through a translation boundary
//! - Static transition table validation
//! - A registry of definitions loaded from YAML/JSON files
//!
//! ```
//! use enumfield_core::{enumfield, Enum};
//!
//! enumfield! {
//!     pub struct BeerStyle {
//!         LAGER = 0,
//!         STOUT = 1,
//!         WEISSBIER = 2,
//!     }
//!     transitions {
//!         STOUT <- [LAGER],
//!         WEISSBIER <- [STOUT],
//!     }
//! }
//!
//! assert!(BeerStyle::is_valid_transition(BeerStyle::LAGER, BeerStyle::STOUT));
//! assert!(!BeerStyle::is_valid_transition(BeerStyle::LAGER, BeerStyle::WEISSBIER));
//! assert_eq!(BeerStyle::name(2).unwrap(), "WEISSBIER");
//! ```

pub mod definition;
pub mod error;
pub mod label;
mod macros;
pub mod registry;
pub mod transition;
pub mod typed;
pub mod value;

pub use definition::{
    Entries, EnumDefinition, EnumDefinitionBuilder, EnumDefinitionRaw, MemberRef, Origins,
};
pub use error::CoreError;
pub use label::{CatalogTranslator, LazyLabel, NoopTranslator, Translator};
pub use registry::EnumRegistry;
pub use transition::TransitionTable;
pub use typed::Enum;
pub use value::{EnumValue, Identifier};

#[doc(hidden)]
pub mod __private {
    pub use std::sync::OnceLock;
}
