//! Configuration Loading Tests
//!
//! Load `fields.toml` files from disk and build registries from them.

use std::fs;
use std::sync::Arc;

use familiar_fields::config::TermValue;
use familiar_fields::vocabulary::Registry;
use familiar_fields::{Field, FieldsConfig, SchemaError, Value, VocabularyRegistry};
use tempfile::TempDir;

const SAMPLE: &str = r#"
[logging]
filter = "familiar_fields=debug"

[registry]
suggest_threshold = 10
install_global = false

[vocabularies]
colors = ["red", "green", "blue"]
sizes = [1, 2, 3]
"#;

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("fields.toml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE);

    let config = FieldsConfig::load_from(Some(&path)).unwrap();
    assert_eq!(config.logging.filter, "familiar_fields=debug");
    assert_eq!(config.registry.suggest_threshold, 10);
    assert!(!config.registry.install_global);
    assert_eq!(config.vocabulary_names(), vec!["colors", "sizes"]);
    assert_eq!(
        config.vocabularies.entries["sizes"],
        vec![TermValue::Int(1), TermValue::Int(2), TermValue::Int(3)]
    );
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(FieldsConfig::load_from(Some(&path.to_string_lossy())).is_err());
}

#[test]
fn test_registry_from_config() {
    let dir = TempDir::new().unwrap();
    let config = FieldsConfig::load_from(Some(&write_config(&dir, SAMPLE))).unwrap();
    let registry = Arc::new(Registry::from_config(&config).unwrap());
    assert_eq!(registry.names(), vec!["colors", "sizes"]);

    let sizes = registry.get(None, "sizes").unwrap();
    assert!(sizes.contains(&Value::Int(2)));
    assert!(!sizes.contains(&Value::from("2")));

    let color = Field::choice()
        .vocabulary("colors")
        .registry(registry)
        .default("red")
        .build()
        .unwrap();
    assert!(color.validate(&Value::from("blue")).is_ok());
    assert!(color.validate(&Value::from("mauve")).is_err());
}

#[test]
fn test_duplicate_configured_values_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[vocabularies]\nletters = [\"a\", \"b\", \"a\"]\n");
    let config = FieldsConfig::load_from(Some(&path)).unwrap();
    assert!(Registry::from_config(&config).is_err());

    // Surfaced through the crate error type as well
    let err: SchemaError = Registry::from_config(&config).unwrap_err().into();
    assert!(err.to_string().contains("term tokens must be unique"));
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let mut config = FieldsConfig::default();
    config.registry.suggest_threshold = 75;
    config.vocabularies.entries.insert(
        "flags".to_string(),
        vec![TermValue::Bool(true), TermValue::Text("maybe".to_string())],
    );

    let path = dir.path().join("saved.toml");
    let path = path.to_string_lossy().into_owned();
    config.save(&path).unwrap();

    let reloaded = FieldsConfig::load_from(Some(&path)).unwrap();
    assert_eq!(reloaded.registry.suggest_threshold, 75);
    assert_eq!(reloaded.logging.filter, "info");
    assert_eq!(
        reloaded.vocabularies.entries["flags"],
        vec![TermValue::Bool(true), TermValue::Text("maybe".to_string())]
    );
}
