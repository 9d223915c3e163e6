//! Configuration for field tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (fields.toml)
//! - Environment variables (FIELDS__*)
//!
//! ## Example config file (fields.toml):
//! ```toml
//! [logging]
//! filter = "familiar_fields=debug"
//!
//! [registry]
//! suggest_threshold = 50
//! install_global = true
//!
//! [vocabularies]
//! colors = ["red", "green", "blue"]
//! sizes = [1, 2, 3]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Vocabulary registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Named simple vocabularies
    #[serde(default)]
    pub vocabularies: VocabulariesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Minimum fuzzy score for "did you mean" suggestions
    #[serde(default = "default_suggest_threshold")]
    pub suggest_threshold: i64,

    /// Install the configured registry as the process-wide one
    #[serde(default = "default_true")]
    pub install_global: bool,
}

/// Vocabulary name to its values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabulariesConfig {
    #[serde(flatten)]
    pub entries: IndexMap<String, Vec<TermValue>>,
}

/// A vocabulary value as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&TermValue> for Value {
    fn from(term: &TermValue) -> Self {
        match term {
            TermValue::Bool(b) => Value::Bool(*b),
            TermValue::Int(i) => Value::Int(*i),
            TermValue::Float(x) => Value::Float(*x),
            TermValue::Text(s) => Value::Text(s.clone()),
        }
    }
}

// Default value functions
fn default_filter() -> String {
    "info".to_string()
}

fn default_suggest_threshold() -> i64 {
    50
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            suggest_threshold: default_suggest_threshold(),
            install_global: true,
        }
    }
}

impl FieldsConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["fields.toml", ".fields.toml", "config/fields.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "fields") {
            let xdg_config = config_dir.config_dir().join("fields.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // FIELDS__REGISTRY__SUGGEST_THRESHOLD=70
        builder = builder.add_source(
            Environment::with_prefix("FIELDS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Names of the configured vocabularies
    pub fn vocabulary_names(&self) -> Vec<&str> {
        self.vocabularies.entries.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FieldsConfig::default();
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.registry.suggest_threshold, 50);
        assert!(config.registry.install_global);
        assert!(config.vocabularies.entries.is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let mut config = FieldsConfig::default();
        config
            .vocabularies
            .entries
            .insert("colors".to_string(), vec![TermValue::Text("red".to_string())]);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("colors"));
    }

    #[test]
    fn test_term_values_from_toml() {
        let config: FieldsConfig = toml::from_str(
            r#"
            [vocabularies]
            mixed = ["a", 1, 2.5, true]
            "#,
        )
        .unwrap();
        let values: Vec<Value> = config.vocabularies.entries["mixed"].iter().map(Value::from).collect();
        assert_eq!(
            values,
            vec![Value::from("a"), Value::Int(1), Value::Float(2.5), Value::Bool(true)]
        );
        assert_eq!(config.registry.suggest_threshold, 50);
        assert_eq!(config.vocabulary_names(), vec!["mixed"]);
    }
}
