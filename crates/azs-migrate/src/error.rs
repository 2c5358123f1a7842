//! Error types for azs-migrate

use azs_catalog::CatalogError;
use azs_core::CoreError;
use thiserror::Error;

/// Migration planning errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Catalog could not be read (M001)
    #[error("[M001] Catalog retrieval failed: {0}")]
    Catalog(#[from] CatalogError),

    /// Planning rejected the input (M002)
    #[error("[M002] Planning failed: {0}")]
    Core(#[from] CoreError),

    /// IO error with file path context (M003)
    #[error("[M003] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failed (M004)
    #[error("[M004] Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
