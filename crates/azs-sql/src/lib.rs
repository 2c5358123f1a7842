//! azs-sql - SQL text layer for azsync
//!
//! This crate works on raw object definitions: pattern-based dependency
//! extraction, comparison-only normalization, the schema differ with its
//! `CREATE` to `ALTER` header rewrite, `GO` batch splitting, and a
//! column-level table ALTER generator.

pub mod alter;
pub mod batch;
pub mod differ;
pub mod extractor;
pub mod normalize;

pub use alter::{ColumnAlterGenerator, TableAlterGenerator};
pub use batch::split_batches;
pub use differ::{rewrite_create_to_alter, Definition, SchemaDiffer};
pub use extractor::{extract_dependencies, DependencyExtractor, PatternExtractor};
pub use normalize::{definitions_equivalent, normalize_definition, without_bom};
