//! Command-line configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via ENUMFIELD_CONFIG or --config)
//! 3. Environment variables
//! 4. Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inspector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enum definition files (YAML, or JSON by extension).
    pub definitions: Vec<PathBuf>,
    /// Optional msgid -> msgstr catalog used for labels.
    pub translations: Option<PathBuf>,
    /// Log filter used when RUST_LOG is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            translations: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or ENUMFIELD_CONFIG), then applies
    /// environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var("ENUMFIELD_CONFIG").ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file. Relative definition and
    /// translation paths are resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        if let Some(base) = path.parent() {
            for def in &mut config.definitions {
                if def.is_relative() {
                    *def = base.join(&*def);
                }
            }
            if let Some(t) = config.translations.as_mut().filter(|t| t.is_relative()) {
                *t = base.join(&*t);
            }
        }
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(paths) = std::env::var("ENUMFIELD_DEFINITIONS") {
            self.definitions = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }

        if let Ok(path) = std::env::var("ENUMFIELD_TRANSLATIONS") {
            self.translations = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Ok(level) = std::env::var("ENUMFIELD_LOG") {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
    }

    /// Checks that there is something to load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.definitions.is_empty() {
            return Err(ConfigError::ValidationError(
                "no definition files configured (use --definitions or ENUMFIELD_DEFINITIONS)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
