//! azs-migrate - Migration planning for azsync
//!
//! Combines catalog snapshots, the dependency graph and the schema differ
//! into an ordered migration plan, and turns plans into scripts, JSON
//! reports and numbered migration files.

pub mod error;
pub mod files;
pub mod plan;
pub mod planner;
pub mod render;
pub mod report;

pub use error::{MigrateError, MigrateResult};
pub use files::{next_migration_path, write_migration};
pub use plan::{KindCounts, MigrationPlan, PlanDiagnostics, PlanEntry, PlanSummary};
pub use planner::MigrationPlanner;
pub use render::render_script;
pub use report::PlanReport;
