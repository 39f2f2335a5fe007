//! Tests for loading schema directories into a registry.

use reqschema::{FileSystem, SchemaLoadError, SchemaRegistry, ValidatorOptions};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MemoryFsError(String);

#[derive(Default)]
struct MemoryFs {
    files: HashMap<PathBuf, String>,
}

impl MemoryFs {
    fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MemoryFs {
    type Error = MemoryFsError;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| MemoryFsError(format!("no such file: {}", path.display())))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error> {
        let entries: Vec<_> = self
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(MemoryFsError(format!("no such directory: {}", path.display())));
        }
        Ok(entries)
    }
}

const USER_SCHEMA: &str = r#"{
    "types": {
        "body": {"name": {"type": "string", "required": true, "length": 3}}
    }
}"#;

#[test]
fn test_loads_each_json_file() {
    let fs = MemoryFs::default()
        .with_file("schemas/create_user.json", USER_SCHEMA)
        .with_file("schemas/update_user.json", USER_SCHEMA)
        .with_file("schemas/README.md", "# schemas");

    let registry = SchemaRegistry::new();
    let loaded = registry.load_dir_with("schemas", &fs).unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(registry.names(), vec!["create_user", "update_user"]);
}

#[test]
fn test_loaded_schemas_use_registry_options() {
    let fs = MemoryFs::default().with_file("schemas/create_user.json", USER_SCHEMA);

    let registry = SchemaRegistry::new().with_options(ValidatorOptions::new().sanitize(true));
    registry.load_dir_with("schemas", &fs).unwrap();

    let result = registry
        .validate("create_user", &json!({"body": {"name": "Grace"}}))
        .unwrap();
    assert_eq!(
        result.errors()[0].message,
        "Length of 'name' is 5 when it should be 3"
    );
}

#[test]
fn test_reports_every_failing_file() {
    let fs = MemoryFs::default()
        .with_file("schemas/good.json", USER_SCHEMA)
        .with_file("schemas/broken.json", "{")
        .with_file(
            "schemas/typo.json",
            r#"{"types": {"body": {"x": {"type": "strnig"}}}}"#,
        );

    let registry = SchemaRegistry::new();
    let err = registry.load_dir_with("schemas", &fs).unwrap_err();

    let SchemaLoadError::Multiple(errors) = err else {
        panic!("expected accumulated errors");
    };
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], SchemaLoadError::Parse(path, _) if path.ends_with("broken.json")));
    let SchemaLoadError::Schema(path, schema_errors) = &errors[1] else {
        panic!("expected a schema error");
    };
    assert!(path.ends_with("typo.json"));
    assert_eq!(schema_errors.first().code(), "unknown_type");

    assert_eq!(registry.names(), vec!["good"]);
}

#[test]
fn test_name_collision_is_reported() {
    let fs = MemoryFs::default().with_file("schemas/create_user.json", USER_SCHEMA);

    let registry = SchemaRegistry::new();
    registry.load_dir_with("schemas", &fs).unwrap();
    let err = registry.load_dir_with("schemas", &fs).unwrap_err();

    let SchemaLoadError::Multiple(errors) = err else {
        panic!("expected accumulated errors");
    };
    assert!(matches!(errors[0], SchemaLoadError::Registry(..)));
}

#[test]
fn test_missing_directory() {
    let registry = SchemaRegistry::new();
    let err = registry
        .load_dir_with("nowhere", &MemoryFs::default())
        .unwrap_err();
    assert!(matches!(err, SchemaLoadError::Io(..)));
}

#[test]
fn test_load_dir_from_disk() {
    let dir = std::env::temp_dir().join(format!("reqschema-load-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ping.json"), r#"{"types": {"query": {}}}"#).unwrap();

    let registry = SchemaRegistry::new();
    let loaded = registry.load_dir(&dir);
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded.unwrap(), 1);
    assert!(registry
        .validate("ping", &json!({"query": {}}))
        .unwrap()
        .is_valid());
}
