//! Loading schema files into a registry.
//!
//! Every `*.json` file in a directory is decoded as a schema definition and
//! registered under its file stem, so `schemas/create_user.json` becomes
//! `create_user`. Files are independent: a bad file does not stop the others
//! from loading, and every failure is reported together.
//!
//! File access goes through the [`FileSystem`] trait so loading can be tested
//! without touching disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SchemaErrors;
use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::{Schema, SchemaDefinition};

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the contents of a file as a string.
    fn read_file(&self, path: &Path) -> Result<String, Self::Error>;

    /// Lists all entries in a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    type Error = std::io::Error;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

/// Errors that can occur while loading schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, Box<dyn std::error::Error + Send + Sync>),

    #[error("Parse error in {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    #[error("Schema error in {0}: {1}")]
    Schema(PathBuf, SchemaErrors),

    #[error("Invalid filename: {0}")]
    InvalidFileName(PathBuf),

    #[error("Registry error in {0}: {1}")]
    Registry(PathBuf, RegistryError),

    #[error("{} schema file(s) failed to load", .0.len())]
    Multiple(Vec<SchemaLoadError>),
}

impl SchemaRegistry {
    /// Loads every `*.json` schema in `dir` from disk.
    ///
    /// See [`load_dir_with`](Self::load_dir_with).
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, SchemaLoadError> {
        self.load_dir_with(dir, &StdFileSystem)
    }

    /// Loads every `*.json` schema in `dir` through `fs`.
    ///
    /// Files are processed in path order. Each valid file is registered with
    /// the registry's options under its file stem. Returns how many schemas
    /// were registered.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError::Io`] if the directory cannot be listed, or
    /// [`SchemaLoadError::Multiple`] with one entry per file that failed.
    /// Files that loaded successfully stay registered either way.
    pub fn load_dir_with<Fs: FileSystem>(
        &self,
        dir: impl AsRef<Path>,
        fs: &Fs,
    ) -> Result<usize, SchemaLoadError> {
        let dir = dir.as_ref();
        let mut files = fs
            .read_dir(dir)
            .map_err(|e| SchemaLoadError::Io(dir.to_path_buf(), Box::new(e)))?;
        files.retain(|file| file.extension().and_then(|s| s.to_str()) == Some("json"));
        files.sort();

        let mut loaded = 0;
        let mut errors = Vec::new();

        for file in &files {
            match self.load_schema_file(file, fs) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "failed to load schema");
                    errors.push(e);
                }
            }
        }

        debug!(
            dir = %dir.display(),
            loaded,
            failed = errors.len(),
            "loaded schema directory"
        );

        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(SchemaLoadError::Multiple(errors))
        }
    }

    fn load_schema_file<Fs: FileSystem>(
        &self,
        path: &Path,
        fs: &Fs,
    ) -> Result<(), SchemaLoadError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SchemaLoadError::InvalidFileName(path.to_path_buf()))?;

        let content = fs
            .read_file(path)
            .map_err(|e| SchemaLoadError::Io(path.to_path_buf(), Box::new(e)))?;

        let definition: SchemaDefinition = serde_json::from_str(&content)
            .map_err(|e| SchemaLoadError::Parse(path.to_path_buf(), e))?;

        let schema = Schema::from_definition(definition)
            .map_err(|e| SchemaLoadError::Schema(path.to_path_buf(), e))?;

        self.register_schema(name, schema)
            .map_err(|e| SchemaLoadError::Registry(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct MockFileSystemError(String);

    impl std::fmt::Display for MockFileSystemError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for MockFileSystemError {}

    #[derive(Default)]
    struct MockFileSystem {
        files: HashMap<PathBuf, String>,
    }

    impl MockFileSystem {
        fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
            self.files.insert(path.into(), content.into());
        }
    }

    impl FileSystem for MockFileSystem {
        type Error = MockFileSystemError;

        fn read_file(&self, path: &Path) -> Result<String, Self::Error> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| MockFileSystemError(format!("File not found: {}", path.display())))
        }

        fn read_dir(&self, _path: &Path) -> Result<Vec<PathBuf>, Self::Error> {
            Ok(self.files.keys().cloned().collect())
        }
    }

    #[test]
    fn test_registers_by_file_stem() {
        let mut fs = MockFileSystem::default();
        fs.add_file(
            "create_user.json",
            r#"{"types": {"body": {"name": {"type": "string", "required": true}}}}"#,
        );
        fs.add_file("notes.txt", "ignored");

        let registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir_with(".", &fs).unwrap(), 1);
        assert_eq!(registry.names(), vec!["create_user".to_string()]);
    }

    #[test]
    fn test_bad_files_do_not_block_good_ones() {
        let mut fs = MockFileSystem::default();
        fs.add_file("a_valid.json", r#"{"types": {}}"#);
        fs.add_file("b_broken.json", "not json");
        fs.add_file(
            "c_unknown.json",
            r#"{"types": {"body": {"x": {"type": "Nope"}}}}"#,
        );

        let registry = SchemaRegistry::new();
        let Err(SchemaLoadError::Multiple(errors)) = registry.load_dir_with(".", &fs) else {
            panic!("expected accumulated errors");
        };

        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], SchemaLoadError::Parse(..)));
        assert!(matches!(errors[1], SchemaLoadError::Schema(..)));
        assert!(registry.contains("a_valid"));
    }
}
