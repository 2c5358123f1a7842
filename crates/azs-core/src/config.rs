//! Configuration types and parsing for azsync.yml
//!
//! The file is shared with the export/import tooling, so unknown keys such
//! as connection settings are ignored rather than rejected.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default local schema root
pub const DEFAULT_SQL_SCHEMA_DIR: &str = "sql/schema";

/// Default output directory for generated migrations
pub const DEFAULT_MIGRATIONS_DIR: &str = "sql/migrations";

/// Schema assumed for unqualified names
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Config file names looked up in a directory, in order
pub const CONFIG_FILE_NAMES: [&str; 3] = ["azsync.yml", "azsync.yaml", "azsync.json"];

/// Main configuration from azsync.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Schema the migration is scoped to
    #[serde(default)]
    pub schema_name: Option<String>,

    /// Shorthand for `schema_name`
    #[serde(default)]
    pub schema: Option<String>,

    /// Local schema root (one folder per object kind)
    #[serde(default)]
    pub sql_schema_dir: Option<String>,

    /// Directory receiving `updateNNNN.sql` files
    #[serde(default)]
    pub migrations_dir: Option<String>,

    /// Schema assumed for unqualified object file names
    #[serde(default)]
    pub default_schema: Option<String>,

    /// Promote dependency cycle warnings to errors
    #[serde(default)]
    pub fail_on_cycle: bool,

    /// Migration-specific overrides
    #[serde(default)]
    pub migrate: MigrateConfig,
}

/// `migrate:` section; takes precedence over the top-level keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Schema override
    #[serde(default)]
    pub schema_name: Option<String>,

    /// Local schema root override
    #[serde(default)]
    pub sql_schema_dir: Option<String>,

    /// Migrations directory override
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Values supplied on the command line; highest precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--schema`
    pub schema_name: Option<String>,
    /// `--sql-schema-dir` / `--desired`
    pub sql_schema_dir: Option<String>,
    /// `--migrations-dir`
    pub migrations_dir: Option<String>,
    /// `--fail-on-cycle`
    pub fail_on_cycle: bool,
}

/// Configuration after applying precedence and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Schema label, if any source provided one
    pub schema_name: Option<String>,
    /// Local schema root
    pub sql_schema_dir: PathBuf,
    /// Migrations output directory
    pub migrations_dir: PathBuf,
    /// Schema for unqualified names
    pub default_schema: String,
    /// Treat cycles as fatal
    pub fail_on_cycle: bool,
}

impl Config {
    /// Load configuration from a file. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: Config = if is_json {
            serde_json::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the config named explicitly, or the first `azsync.*` file found
    /// in `dir`. No file at all yields the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> CoreResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                log::debug!("Using config {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let schema_fields = [
            ("schema_name", &self.schema_name),
            ("schema", &self.schema),
            ("default_schema", &self.default_schema),
            ("migrate.schema_name", &self.migrate.schema_name),
        ];
        for (field, value) in schema_fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{}' cannot be empty", field),
                });
            }
        }
        Ok(())
    }

    /// Apply precedence: CLI > `migrate.*` > top-level > defaults.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> ResolvedConfig {
        let schema_name = overrides
            .schema_name
            .clone()
            .or_else(|| self.migrate.schema_name.clone())
            .or_else(|| self.schema_name.clone())
            .or_else(|| self.schema.clone());

        let sql_schema_dir = overrides
            .sql_schema_dir
            .clone()
            .or_else(|| self.migrate.sql_schema_dir.clone())
            .or_else(|| self.sql_schema_dir.clone())
            .unwrap_or_else(|| DEFAULT_SQL_SCHEMA_DIR.to_string());

        let migrations_dir = overrides
            .migrations_dir
            .clone()
            .or_else(|| self.migrate.migrations_dir.clone())
            .or_else(|| self.migrations_dir.clone())
            .unwrap_or_else(|| DEFAULT_MIGRATIONS_DIR.to_string());

        let default_schema = self
            .default_schema
            .clone()
            .or_else(|| schema_name.clone())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        ResolvedConfig {
            schema_name,
            sql_schema_dir: PathBuf::from(sql_schema_dir),
            migrations_dir: PathBuf::from(migrations_dir),
            default_schema,
            fail_on_cycle: overrides.fail_on_cycle || self.fail_on_cycle,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
