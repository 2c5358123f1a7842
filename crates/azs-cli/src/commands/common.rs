//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use azs_core::{Config, ConfigOverrides, ResolvedConfig};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main never prints this.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the config named by `--config`, or discover one in the working
/// directory, and apply the command-line overrides.
pub(crate) fn resolve_config(
    global: &GlobalArgs,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    resolve_config_in(global, overrides, Path::new("."))
}

pub(crate) fn resolve_config_in(
    global: &GlobalArgs,
    overrides: &ConfigOverrides,
    dir: &Path,
) -> Result<ResolvedConfig> {
    let config = Config::discover(global.config.as_deref().map(Path::new), dir)
        .context("Failed to load configuration")?;
    let resolved = config.resolve(overrides);
    log::debug!(
        "Desired tree {}, migrations in {}, default schema {}",
        resolved.sql_schema_dir.display(),
        resolved.migrations_dir.display(),
        resolved.default_schema
    );
    Ok(resolved)
}
