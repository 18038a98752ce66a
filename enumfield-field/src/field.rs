//! Field adapter.
//!
//! [`EnumField`] describes a model field backed by an enum: the external
//! field system receives the enum's choices and default plus whatever
//! options the caller sets, forwarded unchanged.

use crate::error::FieldError;
use crate::tracked::TrackedValue;
use enumfield_core::{
    EnumDefinition, EnumValue, Identifier, MemberRef, NoopTranslator, Translator,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options the adapter fills in from the enum itself.
const RESERVED_OPTIONS: &[&str] = &["choices", "default"];

/// One allowed choice as handed to the field system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: i64,
    pub name: String,
    pub label: String,
}

/// Configuration consumed by the external model/field system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Name of the backing enum.
    pub enum_name: String,
    /// Allowed choices, ascending by value.
    pub choices: Vec<Choice>,
    /// Default stored value.
    pub default: i64,
    /// Caller-supplied options, forwarded unchanged.
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Checksum of the enum definition, for detecting enum changes.
    pub checksum: String,
}

/// An enum-backed model field.
#[derive(Debug, Clone)]
pub struct EnumField<'a> {
    definition: &'a EnumDefinition,
    null: bool,
    default: Option<MemberRef>,
    options: Map<String, Value>,
}

impl EnumField<'static> {
    /// Field for a typed enum declared in code.
    pub fn for_enum<E: enumfield_core::Enum>() -> Self {
        Self::new(E::definition())
    }
}

impl<'a> EnumField<'a> {
    pub fn new(definition: &'a EnumDefinition) -> Self {
        Self {
            definition,
            null: false,
            default: None,
            options: Map::new(),
        }
    }

    pub fn definition(&self) -> &'a EnumDefinition {
        self.definition
    }

    /// Allows NULL in storage.
    pub fn null(mut self, null: bool) -> Self {
        self.null = null;
        self.options.insert("null".to_string(), Value::Bool(null));
        self
    }

    pub fn blank(self, blank: bool) -> Self {
        self.option("blank", blank)
    }

    pub fn db_index(self, db_index: bool) -> Self {
        self.option("db_index", db_index)
    }

    pub fn help_text(self, text: impl Into<String>) -> Self {
        self.option("help_text", text.into())
    }

    /// Overrides the enum's default for this field.
    pub fn default(mut self, member: impl Into<MemberRef>) -> Self {
        self.default = Some(member.into());
        self
    }

    /// Sets an arbitrary option for the field system.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.null
    }

    /// Builds the field configuration with untranslated labels.
    pub fn config(&self) -> Result<FieldConfig, FieldError> {
        self.config_with(&NoopTranslator)
    }

    /// Builds the field configuration, translating labels.
    pub fn config_with(&self, translator: &dyn Translator) -> Result<FieldConfig, FieldError> {
        if let Some(key) = RESERVED_OPTIONS
            .iter()
            .find(|key| self.options.contains_key(**key))
        {
            return Err(FieldError::ReservedOption(key.to_string()));
        }

        let choices = self
            .definition
            .choices()
            .into_iter()
            .map(|(value, member)| {
                Ok(Choice {
                    value,
                    name: member.name.clone(),
                    label: self.definition.label(value)?.resolve(translator),
                })
            })
            .collect::<Result<Vec<_>, FieldError>>()?;

        Ok(FieldConfig {
            enum_name: self.definition.enum_name().to_string(),
            choices,
            default: self.default_value()?,
            options: self.options.clone(),
            checksum: self.definition.checksum().to_string(),
        })
    }

    /// The field's default: the caller override if set, else the enum's.
    pub fn default_value(&self) -> Result<i64, FieldError> {
        let Some(member) = &self.default else {
            return Ok(self.definition.default());
        };

        let resolved = match member {
            MemberRef::Value(v) => self.definition.get(*v),
            MemberRef::Name(n) => self.definition.get(Identifier::parse(n)),
        };
        resolved
            .map(EnumValue::value)
            .ok_or_else(|| FieldError::InvalidDefault {
                enum_name: self.definition.enum_name().to_string(),
                default: member.to_string(),
            })
    }

    /// Converts a name or value into the stored value.
    pub fn to_storage<'i>(&self, identifier: impl Into<Identifier<'i>>) -> Result<i64, FieldError> {
        let identifier = identifier.into();
        self.definition
            .get(identifier)
            .map(EnumValue::value)
            .ok_or_else(|| self.invalid_choice(identifier))
    }

    /// Like [`to_storage`](Self::to_storage), for nullable input.
    pub fn to_storage_opt<'i>(
        &self,
        identifier: Option<Identifier<'i>>,
    ) -> Result<Option<i64>, FieldError> {
        match identifier {
            Some(identifier) => self.to_storage(identifier).map(Some),
            None if self.null => Ok(None),
            None => Err(self.null_not_allowed()),
        }
    }

    /// Resolves a stored value back into its member.
    pub fn from_storage(&self, value: i64) -> Result<&'a EnumValue, FieldError> {
        Ok(self.definition.try_get(value)?)
    }

    /// Checks a value before it is stored.
    pub fn validate(&self, value: Option<i64>) -> Result<(), FieldError> {
        match value {
            Some(v) if self.definition.contains(v) => Ok(()),
            Some(v) => Err(self.invalid_choice(Identifier::Value(v))),
            None if self.null => Ok(()),
            None => Err(self.null_not_allowed()),
        }
    }

    /// Checks a proposed change of a stored value.
    pub fn validate_transition(&self, from: i64, to: i64) -> Result<(), FieldError> {
        self.validate(Some(to))?;
        if self.definition.is_valid_transition(from, to) {
            return Ok(());
        }

        tracing::warn!(
            "Rejected {} transition {} -> {}",
            self.definition.enum_name(),
            self.display_value(from),
            self.display_value(to)
        );
        Err(FieldError::InvalidTransition {
            enum_name: self.definition.enum_name().to_string(),
            from: self.display_value(from),
            to: self.display_value(to),
        })
    }

    /// Starts tracking a field value loaded from storage.
    pub fn track(&self, persisted: i64) -> Result<TrackedValue<'_, 'a>, FieldError> {
        TrackedValue::loaded(self, persisted)
    }

    /// Starts tracking a field value that has never been stored.
    pub fn track_new(&self) -> Result<TrackedValue<'_, 'a>, FieldError> {
        TrackedValue::unsaved(self)
    }

    fn display_value(&self, value: i64) -> String {
        self.definition
            .name(value)
            .map_or_else(|_| value.to_string(), str::to_string)
    }

    fn invalid_choice(&self, identifier: Identifier<'_>) -> FieldError {
        FieldError::InvalidChoice {
            enum_name: self.definition.enum_name().to_string(),
            value: identifier.to_string(),
        }
    }

    fn null_not_allowed(&self) -> FieldError {
        FieldError::NullNotAllowed {
            enum_name: self.definition.enum_name().to_string(),
        }
    }
}
