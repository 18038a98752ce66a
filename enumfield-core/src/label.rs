//! Human readable labels and the translation boundary.
//!
//! Labels are derived from member names (`NOT_STARTED` becomes `Not Started`)
//! and used as message ids for a [`Translator`]. Translation is deferred: a
//! [`LazyLabel`] carries the message id and is resolved when rendered for a
//! locale.

use crate::error::CoreError;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Derives the message id for a member name.
///
/// Underscores become spaces, then every word is title-cased: a letter is
/// uppercased when it follows a non-letter and lowercased otherwise.
pub fn derive_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_cased = false;
    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// Translates message ids into a display language.
pub trait Translator: Send + Sync {
    fn translate(&self, msgid: &str) -> String;
}

/// Returns message ids unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

impl Translator for NoopTranslator {
    fn translate(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

/// A msgid -> msgstr table. Unknown ids fall back to the msgid.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    messages: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Loads a flat YAML mapping of msgid to msgstr.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(s: &str) -> Result<Self, CoreError> {
        let messages: HashMap<String, String> = serde_yaml::from_str(s)?;
        tracing::debug!("Loaded translation catalog with {} messages", messages.len());
        Ok(Self::new(messages))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }
}

/// A label whose translation happens when it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyLabel {
    msgid: String,
}

impl LazyLabel {
    /// Builds the label for a member name.
    pub fn for_name(name: &str) -> Self {
        Self {
            msgid: derive_label(name),
        }
    }

    pub fn msgid(&self) -> &str {
        &self.msgid
    }

    pub fn resolve(&self, translator: &dyn Translator) -> String {
        translator.translate(&self.msgid)
    }
}

impl fmt::Display for LazyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msgid)
    }
}
