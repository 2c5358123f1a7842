//! Error types for azs-catalog

use azs_core::ObjectKind;
use thiserror::Error;

/// Catalog retrieval errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error with file path context (K001)
    #[error("[K001] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Object file name does not yield an identity (K002)
    #[error("[K002] Cannot derive an object name from file: {path}")]
    InvalidFileName { path: String },

    /// Catalog query failed (K003)
    #[error("[K003] Catalog query for {kind} failed: {message}")]
    QueryFailed { kind: ObjectKind, message: String },

    /// Same identity listed twice for one kind (K004)
    #[error("[K004] Duplicate {kind} '{name}' in {source_name}")]
    DuplicateObject {
        kind: ObjectKind,
        name: String,
        source_name: String,
    },
}

/// Result type alias for CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
