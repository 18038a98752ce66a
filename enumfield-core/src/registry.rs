//! A collection of enum definitions keyed by name.
//!
//! The registry is populated once (from code or definition files) and then
//! shared read-only, typically behind an `Arc`.

use crate::definition::{EnumDefinition, EnumDefinitionRaw};
use crate::error::CoreError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// Enum definitions indexed by enum name.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    enums: BTreeMap<String, Arc<EnumDefinition>>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from already validated definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = EnumDefinition>,
    ) -> Result<Self, CoreError> {
        let mut registry = Self::new();
        registry.register_all(definitions)?;
        Ok(registry)
    }

    /// Adds a definition. Names must be unique.
    pub fn register(&mut self, definition: EnumDefinition) -> Result<Arc<EnumDefinition>, CoreError> {
        let name = definition.enum_name().to_string();
        if self.enums.contains_key(&name) {
            return Err(CoreError::EnumExists { name });
        }

        let definition = Arc::new(definition);
        self.enums.insert(name, definition.clone());
        Ok(definition)
    }

    /// Adds several definitions at once. Either all of them are added or,
    /// on error, none are.
    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = EnumDefinition>,
    ) -> Result<usize, CoreError> {
        let definitions: Vec<EnumDefinition> = definitions.into_iter().collect();

        let mut batch = BTreeSet::new();
        for def in &definitions {
            let name = def.enum_name();
            if self.enums.contains_key(name) || !batch.insert(name) {
                return Err(CoreError::EnumExists {
                    name: name.to_string(),
                });
            }
        }

        let count = definitions.len();
        for def in definitions {
            self.enums.insert(def.enum_name().to_string(), Arc::new(def));
        }
        Ok(count)
    }

    /// Parses a YAML document with one definition or a list of them.
    pub fn load_yaml(&mut self, s: &str) -> Result<usize, CoreError> {
        // Sniff the shape first so parse errors name the offending field
        let document: serde_yaml::Value = serde_yaml::from_str(s)?;
        let raws = if document.is_sequence() {
            serde_yaml::from_str::<Vec<EnumDefinitionRaw>>(s)?
        } else {
            vec![serde_yaml::from_str::<EnumDefinitionRaw>(s)?]
        };
        self.register_raw(raws)
    }

    /// Parses a JSON document with one definition or a list of them.
    pub fn load_json(&mut self, s: &str) -> Result<usize, CoreError> {
        let document: serde_json::Value = serde_json::from_str(s)?;
        let raws = if document.is_array() {
            serde_json::from_str::<Vec<EnumDefinitionRaw>>(s)?
        } else {
            vec![serde_json::from_str::<EnumDefinitionRaw>(s)?]
        };
        self.register_raw(raws)
    }

    /// Loads a definition file. `.json` files are parsed as JSON, anything
    /// else as YAML. Returns the number of definitions added.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let count = if is_json {
            self.load_json(&content)?
        } else {
            self.load_yaml(&content)?
        };
        tracing::info!("Loaded {} enum definition(s) from {}", count, path.display());
        Ok(count)
    }

    fn register_raw(&mut self, raws: Vec<EnumDefinitionRaw>) -> Result<usize, CoreError> {
        let definitions = raws
            .into_iter()
            .map(EnumDefinition::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        self.register_all(definitions)
    }

    /// Returns the definition named `name`.
    pub fn get(&self, name: &str) -> Result<Arc<EnumDefinition>, CoreError> {
        self.enums
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::EnumNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Enum names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.enums.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EnumDefinition>> {
        self.enums.values()
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = r#"
- name: BeerStyle
  members:
    LAGER: 0
    STOUT: 1
    WEISSBIER: 2
  transitions:
    STOUT: LAGER
    WEISSBIER: STOUT
- name: Color
  members:
    RED: 1
    GREEN: 2
"#;

    #[test]
    fn test_load_yaml_list() {
        let mut registry = EnumRegistry::new();
        assert_eq!(registry.load_yaml(DEFINITIONS).unwrap(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["BeerStyle", "Color"]);

        let beer = registry.get("BeerStyle").unwrap();
        assert!(beer.is_valid_transition(1, 2));
        assert!(!registry.get("Color").unwrap().has_transitions());
    }

    #[test]
    fn test_load_single_definition() {
        let mut registry = EnumRegistry::new();
        let count = registry
            .load_yaml("name: Toggle\nmembers:\n  OFF: 0\n  ON: 1\n")
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(registry.get("Toggle").unwrap().default(), 0);
    }

    #[test]
    fn test_numeric_transition_keys() {
        let mut registry = EnumRegistry::new();
        registry
            .load_yaml("- name: Level\n  members:\n    LOW: 1\n    HIGH: 2\n  transitions:\n    2: [1]\n")
            .unwrap();
        let level = registry.get("Level").unwrap();
        assert!(level.is_valid_transition(1, 2));
        assert!(!level.is_valid_transition(2, 1));
    }

    #[test]
    fn test_duplicate_enum_rejected() {
        let mut registry = EnumRegistry::new();
        registry.load_yaml(DEFINITIONS).unwrap();
        let result = registry.load_yaml("name: Color\nmembers:\n  BLUE: 3\n");
        assert!(matches!(result, Err(CoreError::EnumExists { .. })));
    }

    #[test]
    fn test_unknown_enum() {
        let registry = EnumRegistry::new();
        let err = registry.get("Missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_definition_in_file() {
        let mut registry = EnumRegistry::new();
        let result = registry.load_yaml("name: Broken\nmembers:\n  A: 1\n  B: 1\n");
        assert!(matches!(result, Err(CoreError::DuplicateValue { .. })));
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("beer.yaml");
        let json_path = dir.path().join("status.json");
        std::fs::write(&yaml_path, DEFINITIONS).unwrap();
        std::fs::write(
            &json_path,
            r#"{"name": "Status", "members": {"DRAFT": 0, "LIVE": 1}, "transitions": {"LIVE": ["DRAFT"]}}"#,
        )
        .unwrap();

        let mut registry = EnumRegistry::new();
        assert_eq!(registry.load_file(&yaml_path).unwrap(), 2);
        assert_eq!(registry.load_file(&json_path).unwrap(), 1);
        assert_eq!(registry.len(), 3);
        assert!(registry.get("Status").unwrap().is_valid_transition(0, 1));
    }

    #[test]
    fn test_failed_batch_leaves_registry_unchanged() {
        let mut registry = EnumRegistry::new();
        let broken = "- name: Good\n  members:\n    A: 1\n- name: Bad\n  members:\n    X: 1\n    Y: 1\n";
        assert!(matches!(
            registry.load_yaml(broken),
            Err(CoreError::DuplicateValue { .. })
        ));
        assert!(registry.is_empty());

        // The corrected file loads cleanly afterwards
        let fixed = "- name: Good\n  members:\n    A: 1\n- name: Bad\n  members:\n    X: 1\n    Y: 2\n";
        assert_eq!(registry.load_yaml(fixed).unwrap(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Bad", "Good"]);
    }

    #[test]
    fn test_name_collision_within_batch() {
        let mut registry = EnumRegistry::new();
        registry.load_yaml("name: Color\nmembers:\n  RED: 1\n").unwrap();

        let result = registry.load_yaml(
            "- name: Size\n  members:\n    S: 1\n- name: Size\n  members:\n    M: 2\n",
        );
        assert!(matches!(result, Err(CoreError::EnumExists { name }) if name == "Size"));
        assert_eq!(registry.len(), 1);

        let result = registry.load_yaml(
            "- name: Shape\n  members:\n    ROUND: 1\n- name: Color\n  members:\n    BLUE: 2\n",
        );
        assert!(matches!(result, Err(CoreError::EnumExists { name }) if name == "Color"));
        assert!(!registry.contains("Shape"));
    }

    #[test]
    fn test_from_definitions() {
        let toggle = EnumDefinition::builder("Toggle")
            .member("OFF", 0)
            .member("ON", 1)
            .build()
            .unwrap();
        let registry = EnumRegistry::from_definitions([toggle.clone()]).unwrap();
        assert_eq!(registry.get("Toggle").unwrap().checksum(), toggle.checksum());

        let result = EnumRegistry::from_definitions([toggle.clone(), toggle.clone()]);
        assert!(matches!(result, Err(CoreError::EnumExists { .. })));

        let mut registry = EnumRegistry::new();
        let shared = registry.register(toggle.clone()).unwrap();
        assert!(Arc::ptr_eq(&shared, &registry.get("Toggle").unwrap()));
        assert!(matches!(
            registry.register(toggle),
            Err(CoreError::EnumExists { .. })
        ));
    }

    #[test]
    fn test_repeated_json_member_rejected() {
        let mut registry = EnumRegistry::new();
        let result = registry.load_json(r#"{"name": "Beer", "members": {"STOUT": 1, "STOUT": 2}}"#);
        assert!(matches!(result, Err(CoreError::DuplicateName { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_parse_error_names_the_field() {
        let mut registry = EnumRegistry::new();
        let err = registry
            .load_yaml("name: Beer\nmembers:\n  LAGER: zero\n")
            .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, CoreError::Yaml(_)));
        assert!(message.contains("zero"), "{}", message);
        assert!(message.contains("expected i64"), "{}", message);
        assert!(!message.contains("untagged"), "{}", message);

        let err = registry
            .load_json(r#"[{"name": "Beer", "members": {"LAGER": "zero"}}]"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
        assert!(err.to_string().contains("line 1"), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        let mut registry = EnumRegistry::new();
        let result = registry.load_file("/nonexistent/enums.yaml");
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
