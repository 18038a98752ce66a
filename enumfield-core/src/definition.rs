//! Enum definitions.
//!
//! A definition is built once by an explicit registration step and is
//! read-only afterwards. Definitions can also be loaded from YAML or JSON:
//!
//! ```yaml
//! name: BeerStyle
//! members:
//!   LAGER: 0
//!   STOUT: 1
//!   WEISSBIER: 2
//! transitions:
//!   STOUT: LAGER
//!   WEISSBIER: [STOUT]
//! default: LAGER
//! ```
//!
//! Transition keys, origins and the default may name a member or give its
//! numeric value.

use crate::error::CoreError;
use crate::label::LazyLabel;
use crate::transition::TransitionTable;
use crate::value::{EnumValue, Identifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Reference to a member by value or by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRef {
    Value(i64),
    Name(String),
}

impl From<i64> for MemberRef {
    fn from(v: i64) -> Self {
        MemberRef::Value(v)
    }
}

impl From<i32> for MemberRef {
    fn from(v: i32) -> Self {
        MemberRef::Value(i64::from(v))
    }
}

impl From<&str> for MemberRef {
    fn from(s: &str) -> Self {
        MemberRef::Name(s.to_string())
    }
}

impl From<String> for MemberRef {
    fn from(s: String) -> Self {
        MemberRef::Name(s)
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::Value(v) => write!(f, "{}", v),
            MemberRef::Name(n) => f.write_str(n),
        }
    }
}

/// Permitted origins of a transition. Deserializes from a single member or a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Origins(pub Vec<MemberRef>);

impl<'de> Deserialize<'de> for Origins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct OriginsVisitor;

        impl<'de> Visitor<'de> for OriginsVisitor {
            type Value = Origins;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a member name, a value, or a list of them")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Origins(vec![MemberRef::Value(v)]))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let v = i64::try_from(v).map_err(|_| E::custom("value out of range"))?;
                Ok(Origins(vec![MemberRef::Value(v)]))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Origins(vec![MemberRef::Name(v.to_string())]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut origins = Vec::new();
                while let Some(m) = seq.next_element::<MemberRef>()? {
                    origins.push(m);
                }
                Ok(Origins(origins))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Origins::default())
            }
        }

        deserializer.deserialize_any(OriginsVisitor)
    }
}

/// Map entries kept in document order, repeated keys included.
///
/// Files are maps, but a plain map would let a repeated key overwrite the
/// earlier one before validation sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries<K, V>(pub Vec<(K, V)>);

impl<K, V> Default for Entries<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K, V> FromIterator<(K, V)> for Entries<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K, V> IntoIterator for Entries<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K, V> Entries<K, V> {
    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Entries<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, K, V> Deserialize<'de> for Entries<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::marker::PhantomData;

        struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for EntriesVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = Entries<K, V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<K, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Raw enum definition as stored in files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinitionRaw {
    /// Enum name.
    pub name: String,

    /// Member name -> numeric value.
    pub members: Entries<String, i64>,

    /// Target -> permitted origins. Absent means transitions are unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Entries<MemberRef, Origins>>,

    /// Default member, overriding the smallest-value rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<MemberRef>,
}

/// Collects members, transitions and a default, then validates them.
#[derive(Debug, Clone)]
pub struct EnumDefinitionBuilder {
    name: String,
    attributes: Vec<(String, i64)>,
    transitions: Option<Vec<(MemberRef, Vec<MemberRef>)>>,
    default: Option<MemberRef>,
}

impl EnumDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            transitions: None,
            default: None,
        }
    }

    /// Declares an attribute. Only uppercase names become members.
    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Declares a transition table, even if it stays empty.
    pub fn with_transitions(mut self) -> Self {
        self.transitions.get_or_insert_with(Vec::new);
        self
    }

    /// Permits transitions into `to` from each of `origins`.
    pub fn transition<T, I, O>(mut self, to: T, origins: I) -> Self
    where
        T: Into<MemberRef>,
        I: IntoIterator<Item = O>,
        O: Into<MemberRef>,
    {
        self.transitions
            .get_or_insert_with(Vec::new)
            .push((to.into(), origins.into_iter().map(Into::into).collect()));
        self
    }

    /// Overrides the default member.
    pub fn default_member(mut self, member: impl Into<MemberRef>) -> Self {
        self.default = Some(member.into());
        self
    }

    /// Validates the collected declarations and builds the definition.
    pub fn build(self) -> Result<EnumDefinition, CoreError> {
        let owner: Arc<str> = Arc::from(self.name.as_str());
        let mut values: BTreeMap<i64, EnumValue> = BTreeMap::new();
        let mut names: HashMap<String, i64> = HashMap::new();

        for (attr, value) in self.attributes {
            if !is_upper(&attr) {
                tracing::debug!("{}: skipping non-uppercase attribute '{}'", owner, attr);
                continue;
            }

            let key = attr.to_uppercase();
            if names.contains_key(&key) {
                return Err(CoreError::DuplicateName {
                    enum_name: owner.to_string(),
                    name: attr,
                });
            }

            if let Some(existing) = values.get(&value) {
                return Err(CoreError::DuplicateValue {
                    enum_name: owner.to_string(),
                    value,
                    first: existing.name.clone(),
                    second: attr,
                });
            }

            names.insert(key, value);
            values.insert(value, EnumValue::new(attr, value, owner.clone()));
        }

        if values.is_empty() {
            return Err(CoreError::InvalidDefinition {
                enum_name: owner.to_string(),
                reason: "no uppercase members declared".to_string(),
            });
        }

        let resolve = |member: &MemberRef, role: &str| -> Result<i64, CoreError> {
            resolve_member(&values, &names, member).ok_or_else(|| CoreError::InvalidDefinition {
                enum_name: owner.to_string(),
                reason: format!("{} '{}' is not a member", role, member),
            })
        };

        let transitions = match self.transitions {
            Some(entries) => {
                let mut table = TransitionTable::new();
                for (to, origins) in &entries {
                    let to = resolve(to, "transition target")?;
                    let origins = origins
                        .iter()
                        .map(|o| resolve(o, "transition origin"))
                        .collect::<Result<Vec<_>, _>>()?;
                    table.insert(to, origins);
                }
                Some(table)
            }
            None => None,
        };

        let default = match &self.default {
            Some(member) => Some(resolve(member, "default")?),
            None => None,
        };

        let mut definition = EnumDefinition {
            name: owner,
            values,
            names,
            transitions,
            default,
            checksum: String::new(),
        };
        definition.checksum = compute_checksum(&definition.to_raw())?;

        tracing::debug!(
            "Registered enum {} ({} members, transitions: {})",
            definition.name,
            definition.values.len(),
            definition
                .transitions
                .as_ref()
                .map_or("unconstrained".to_string(), |t| format!("{} targets", t.len()))
        );

        Ok(definition)
    }
}

/// Validated and indexed enum definition.
#[derive(Debug, Clone)]
pub struct EnumDefinition {
    name: Arc<str>,

    /// Members indexed by value, iterated ascending.
    values: BTreeMap<i64, EnumValue>,

    /// Uppercased member name -> value.
    names: HashMap<String, i64>,

    transitions: Option<TransitionTable>,

    default: Option<i64>,

    /// CRC32C of the canonical raw form.
    checksum: String,
}

impl EnumDefinition {
    /// Starts the registration step for an enum named `name`.
    pub fn builder(name: impl Into<String>) -> EnumDefinitionBuilder {
        EnumDefinitionBuilder::new(name)
    }

    /// Parses and validates a definition from JSON.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CoreError> {
        let raw: EnumDefinitionRaw = serde_json::from_value(json.clone())?;
        Self::from_raw(raw)
    }

    /// Parses and validates a definition from a YAML document.
    pub fn from_yaml(s: &str) -> Result<Self, CoreError> {
        let raw: EnumDefinitionRaw = serde_yaml::from_str(s)?;
        Self::from_raw(raw)
    }

    /// Creates a definition from its raw parts.
    pub fn from_raw(raw: EnumDefinitionRaw) -> Result<Self, CoreError> {
        let mut builder = Self::builder(raw.name);
        for (name, value) in raw.members {
            builder = builder.member(name, value);
        }
        if let Some(transitions) = raw.transitions {
            builder = builder.with_transitions();
            for (to, origins) in transitions {
                builder = builder.transition(to, origins.0);
            }
        }
        if let Some(default) = raw.default {
            builder = builder.default_member(default);
        }
        builder.build()
    }

    /// Returns the raw form, naming members rather than values. Members and
    /// transition targets are listed ascending by value.
    pub fn to_raw(&self) -> EnumDefinitionRaw {
        let name_of = |v: i64| {
            self.values
                .get(&v)
                .map_or(MemberRef::Value(v), |m| MemberRef::Name(m.name.clone()))
        };

        EnumDefinitionRaw {
            name: self.name.to_string(),
            members: self
                .values
                .values()
                .map(|m| (m.name.clone(), m.value))
                .collect(),
            transitions: self.transitions.as_ref().map(|table| {
                table
                    .iter()
                    .map(|(to, origins)| {
                        (
                            name_of(to),
                            Origins(origins.iter().map(|o| name_of(*o)).collect()),
                        )
                    })
                    .collect()
            }),
            default: self.default.map(name_of),
        }
    }

    /// Returns the raw definition as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(self.to_raw())?)
    }

    /// The enum's own name.
    pub fn enum_name(&self) -> &str {
        &self.name
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a built definition; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.values.contains_key(&value)
    }

    /// Iterates members ascending by value.
    pub fn values(&self) -> impl Iterator<Item = &EnumValue> {
        self.values.values()
    }

    /// Looks up a member by value or case-insensitive name.
    pub fn get<'a>(&self, identifier: impl Into<Identifier<'a>>) -> Option<&EnumValue> {
        match identifier.into() {
            Identifier::Value(v) => self.values.get(&v),
            Identifier::Name(n) => self
                .names
                .get(&n.to_uppercase())
                .and_then(|v| self.values.get(v)),
        }
    }

    /// Like [`get`](Self::get), but reports a missing member as an error.
    pub fn try_get<'a>(&self, identifier: impl Into<Identifier<'a>>) -> Result<&EnumValue, CoreError> {
        let identifier = identifier.into();
        self.get(identifier).ok_or_else(|| match identifier {
            Identifier::Value(value) => self.value_not_found(value),
            Identifier::Name(name) => CoreError::NameNotFound {
                enum_name: self.name.to_string(),
                name: name.to_string(),
            },
        })
    }

    /// Returns the symbolic name for a value.
    pub fn name(&self, value: i64) -> Result<&str, CoreError> {
        self.values
            .get(&value)
            .map(|m| m.name.as_str())
            .ok_or_else(|| self.value_not_found(value))
    }

    /// Returns the translatable label for a value.
    pub fn label(&self, value: i64) -> Result<LazyLabel, CoreError> {
        self.name(value).map(LazyLabel::for_name)
    }

    /// `(name, value)` pairs ascending by value.
    pub fn items(&self) -> Vec<(&str, i64)> {
        self.values
            .values()
            .map(|m| (m.name.as_str(), m.value))
            .collect()
    }

    /// `(value, member)` pairs ascending by value.
    pub fn choices(&self) -> Vec<(i64, &EnumValue)> {
        self.values.iter().map(|(v, m)| (*v, m)).collect()
    }

    /// The default value: the declared override, or the smallest value.
    pub fn default(&self) -> i64 {
        self.default
            .or_else(|| self.values.keys().next().copied())
            .unwrap_or_default()
    }

    /// Returns the transition table, if one was declared.
    pub fn transitions(&self) -> Option<&TransitionTable> {
        self.transitions.as_ref()
    }

    pub fn has_transitions(&self) -> bool {
        self.transitions.is_some()
    }

    /// Checks a proposed change from `from` to `to`.
    ///
    /// Self transitions always pass. Without a declared table every
    /// transition passes.
    pub fn is_valid_transition(&self, from: i64, to: i64) -> bool {
        match &self.transitions {
            Some(table) => table.allows(from, to),
            None => true,
        }
    }

    /// Returns the values permitted to transition into `to`.
    pub fn transition_origins(&self, to: i64) -> Result<&BTreeSet<i64>, CoreError> {
        let table = self
            .transitions
            .as_ref()
            .ok_or_else(|| CoreError::TransitionsUndefined {
                enum_name: self.name.to_string(),
            })?;
        table.origins(to).ok_or_else(|| CoreError::TransitionNotFound {
            enum_name: self.name.to_string(),
            value: to,
        })
    }

    /// Returns every value reachable from `from` in one step, `from` included.
    pub fn transition_targets(&self, from: i64) -> Vec<i64> {
        match &self.transitions {
            Some(table) => {
                let mut targets = table.targets_from(from);
                targets.push(from);
                targets.sort_unstable();
                targets
            }
            None => self.values.keys().copied().collect(),
        }
    }

    fn value_not_found(&self, value: i64) -> CoreError {
        CoreError::ValueNotFound {
            enum_name: self.name.to_string(),
            value,
        }
    }
}

/// At least one cased character and no lowercase ones.
fn is_upper(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

fn resolve_member(
    values: &BTreeMap<i64, EnumValue>,
    names: &HashMap<String, i64>,
    member: &MemberRef,
) -> Option<i64> {
    match member {
        MemberRef::Value(v) => values.contains_key(v).then_some(*v),
        MemberRef::Name(n) => match n.trim().parse::<i64>() {
            Ok(v) => values.contains_key(&v).then_some(v),
            Err(_) => names.get(&n.to_uppercase()).copied(),
        },
    }
}

fn compute_checksum(raw: &EnumDefinitionRaw) -> Result<String, CoreError> {
    let json_bytes = serde_json::to_vec(raw)?;
    Ok(format!("{:08x}", crc32c::crc32c(&json_bytes)))
}
