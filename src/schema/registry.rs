//! Schema registry holding the built-in schemas and any loaded from disk
//!
//! - Schema files are JSON, one schema per file, `*.json`
//! - Files are loaded in name order so registration is deterministic
//! - A kind can be registered once; a second registration is rejected
//! - Malformed schema files are FATAL

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::builtin::builtin_schemas;
use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// In-memory registry of schemas, looked up by kind name ignoring case.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Schemas indexed by lowercased kind
    schemas: HashMap<String, Schema>,
    /// Lowercased kinds in registration order
    order: Vec<String>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the User, Product and Lead schemas.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for schema in builtin_schemas() {
            registry.insert(schema.clone());
        }
        registry
    }

    /// Registers a schema.
    ///
    /// The schema structure is checked first. Registering a kind twice is
    /// rejected, whatever the case of the name.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(format!("<{}>", schema.kind), e))?;

        if self.contains(&schema.kind) {
            return Err(SchemaError::duplicate_kind(&schema.kind));
        }

        self.insert(schema);
        Ok(())
    }

    /// Loads every `*.json` schema file in a directory.
    ///
    /// Loading is all-or-nothing: every file is parsed and checked, and
    /// every kind checked for duplicates, before any schema is registered.
    /// A missing directory holds no schemas and is not an error. Returns the
    /// number of schemas loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed_schema(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut batch: Vec<Schema> = Vec::with_capacity(paths.len());
        for path in &paths {
            let schema = read_schema_file(path)?;
            let key = schema.kind.to_lowercase();
            let in_batch = batch.iter().any(|loaded| loaded.kind.to_lowercase() == key);
            if in_batch || self.contains(&schema.kind) {
                return Err(SchemaError::duplicate_kind(&schema.kind));
            }
            batch.push(schema);
        }

        let loaded = batch.len();
        for schema in batch {
            self.insert(schema);
        }
        Ok(loaded)
    }

    /// Inserts a schema already checked for structure and duplicates.
    fn insert(&mut self, schema: Schema) {
        let key = schema.kind.to_lowercase();
        self.order.push(key.clone());
        self.schemas.insert(key, schema);
    }

    /// Gets a schema by kind name, ignoring case.
    pub fn get(&self, kind: &str) -> Option<&Schema> {
        self.schemas.get(&kind.trim().to_lowercase())
    }

    /// Checks if a kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Returns all schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.order.iter().filter_map(|key| self.schemas.get(key))
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Writes a schema to `<dir>/schema_<kind>.json`.
    ///
    /// Existing files are never overwritten.
    pub fn export_schema(dir: &Path, schema: &Schema) -> SchemaResult<PathBuf> {
        let path = dir.join(format!("schema_{}.json", schema.kind.to_lowercase()));

        if path.exists() {
            return Err(SchemaError::file_exists(path.display().to_string()));
        }

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                SchemaError::malformed_schema(
                    dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}

/// Reads and structure-checks a single schema file.
fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed_schema(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    let schema: Schema = serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
    })?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

    Ok(schema)
}
