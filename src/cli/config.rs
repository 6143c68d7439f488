//! Configuration file for the CLI
//!
//! Every field is optional:
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "extra_fields": "ignore",
//!   "log_level": "info"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::observability::Severity;
use crate::schema::ExtraFieldPolicy;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of extra schema files (optional)
    #[serde(default)]
    pub schema_dir: Option<String>,

    /// Handling of undeclared input fields (default "ignore")
    #[serde(default)]
    pub extra_fields: ExtraFieldPolicy,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: None,
            extra_fields: ExtraFieldPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from file when a path is given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;

        if let Some(dir) = &self.schema_dir {
            if dir.trim().is_empty() {
                return Err(CliError::config_error("schema_dir must not be empty"));
            }
        }

        Ok(())
    }

    /// Returns the configured minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Returns the schema directory as a Path
    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_dir.as_deref().map(Path::new)
    }
}
