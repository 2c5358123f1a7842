//! Numbered migration files (`update0001.sql`, `update0002.sql`, ...)

use crate::error::{MigrateError, MigrateResult};
use std::path::{Path, PathBuf};

const PREFIX: &str = "update";
const EXTENSION: &str = ".sql";

fn io_error(path: &Path, source: std::io::Error) -> MigrateError {
    MigrateError::IoWithPath {
        path: path.display().to_string(),
        source,
    }
}

/// Number encoded in a migration file name, if it is one
fn migration_number(file_name: &str) -> Option<u32> {
    let digits = file_name.strip_prefix(PREFIX)?.strip_suffix(EXTENSION)?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Path of the next migration in `dir`: one past the highest existing
/// number, starting at 1. A missing directory counts as empty.
pub fn next_migration_path(dir: &Path) -> MigrateResult<PathBuf> {
    let mut highest = 0;
    if dir.is_dir() {
        for entry in std::fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
            let entry = entry.map_err(|e| io_error(dir, e))?;
            if let Some(n) = entry.file_name().to_str().and_then(migration_number) {
                highest = highest.max(n);
            }
        }
    }
    Ok(dir.join(format!("{}{:04}{}", PREFIX, highest + 1, EXTENSION)))
}

/// Write `script` as the next migration in `dir`, creating the directory
/// if needed. Returns the written path.
pub fn write_migration(dir: &Path, script: &str) -> MigrateResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = next_migration_path(dir)?;
    std::fs::write(&path, script).map_err(|e| io_error(&path, e))?;
    log::info!("Migration written to {}", path.display());
    Ok(path)
}
