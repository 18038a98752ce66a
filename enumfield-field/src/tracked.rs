//! Change tracking for a single field value.
//!
//! A model instance loads a value from storage, may assign new values any
//! number of times, and finally persists. Every assignment is checked
//! against the value that was last persisted, not against intermediate
//! assignments, so `A -> B -> C` is accepted only if `A -> C` is a valid
//! transition.

use crate::error::FieldError;
use crate::field::EnumField;
use enumfield_core::{EnumValue, Identifier};

/// A field value with its last persisted state.
#[derive(Debug, Clone)]
pub struct TrackedValue<'f, 'a> {
    field: &'f EnumField<'a>,
    persisted: Option<i64>,
    current: i64,
}

impl<'f, 'a> TrackedValue<'f, 'a> {
    pub(crate) fn loaded(field: &'f EnumField<'a>, persisted: i64) -> Result<Self, FieldError> {
        field.validate(Some(persisted))?;
        Ok(Self {
            field,
            persisted: Some(persisted),
            current: persisted,
        })
    }

    pub(crate) fn unsaved(field: &'f EnumField<'a>) -> Result<Self, FieldError> {
        Ok(Self {
            field,
            persisted: None,
            current: field.default_value()?,
        })
    }

    /// The value that would be written on the next commit.
    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn current_member(&self) -> Result<&'a EnumValue, FieldError> {
        self.field.from_storage(self.current)
    }

    /// The last persisted value, `None` if never stored.
    pub fn persisted(&self) -> Option<i64> {
        self.persisted
    }

    pub fn is_dirty(&self) -> bool {
        self.persisted != Some(self.current)
    }

    /// Assigns a new value. Unsaved values accept any valid choice.
    pub fn set<'i>(&mut self, identifier: impl Into<Identifier<'i>>) -> Result<(), FieldError> {
        let to = self.field.to_storage(identifier)?;
        if let Some(from) = self.persisted {
            self.field.validate_transition(from, to)?;
        }

        tracing::debug!(
            "{}: {} -> {}",
            self.field.definition().enum_name(),
            self.current,
            to
        );
        self.current = to;
        Ok(())
    }

    /// Marks the current value as persisted and returns it.
    pub fn commit(&mut self) -> i64 {
        self.persisted = Some(self.current);
        self.current
    }

    /// Drops pending changes. Unsaved values fall back to the field default.
    pub fn revert(&mut self) -> Result<(), FieldError> {
        self.current = match self.persisted {
            Some(v) => v,
            None => self.field.default_value()?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumfield_core::{enumfield, EnumDefinition};

    enumfield! {
        struct OrderStatus {
            CREATED = 0,
            PAID = 1,
            SHIPPED = 2,
            CANCELLED = 9,
        }
        transitions {
            PAID <- [CREATED],
            SHIPPED <- [PAID],
            CANCELLED <- [CREATED, PAID],
        }
    }

    #[test]
    fn test_transition_checked_against_persisted() {
        let field = EnumField::for_enum::<OrderStatus>();
        let mut status = field.track(OrderStatus::CREATED).unwrap();
        assert!(!status.is_dirty());

        status.set("paid").unwrap();
        assert!(status.is_dirty());
        // CREATED -> SHIPPED is not allowed even though PAID -> SHIPPED is
        assert!(matches!(
            status.set(OrderStatus::SHIPPED),
            Err(FieldError::InvalidTransition { .. })
        ));
        assert_eq!(status.current(), OrderStatus::PAID);

        assert_eq!(status.commit(), OrderStatus::PAID);
        status.set(OrderStatus::SHIPPED).unwrap();
        assert_eq!(status.current_member().unwrap().name(), "SHIPPED");
    }

    #[test]
    fn test_unsaved_accepts_any_choice() {
        let field = EnumField::for_enum::<OrderStatus>();
        let mut status = field.track_new().unwrap();
        assert_eq!(status.current(), OrderStatus::CREATED);
        assert_eq!(status.persisted(), None);
        assert!(status.is_dirty());

        status.set("shipped").unwrap();
        assert!(matches!(
            status.set("lost"),
            Err(FieldError::InvalidChoice { .. })
        ));
        status.revert().unwrap();
        assert_eq!(status.current(), OrderStatus::CREATED);
    }

    #[test]
    fn test_revert_to_persisted() {
        let field = EnumField::for_enum::<OrderStatus>();
        let mut status = field.track(OrderStatus::PAID).unwrap();
        status.set("cancelled").unwrap();
        status.revert().unwrap();
        assert_eq!(status.current(), OrderStatus::PAID);
        assert!(!status.is_dirty());
    }

    #[test]
    fn test_loading_unknown_value_fails() {
        let field = EnumField::for_enum::<OrderStatus>();
        assert!(matches!(
            field.track(5),
            Err(FieldError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_unconstrained_enum() {
        let def = EnumDefinition::builder("Color")
            .member("RED", 1)
            .member("GREEN", 2)
            .build()
            .unwrap();
        let field = EnumField::new(&def);
        let mut color = field.track(1).unwrap();
        color.set("green").unwrap();
        color.commit();
        color.set("red").unwrap();
        assert_eq!(color.current(), 1);
    }
}
