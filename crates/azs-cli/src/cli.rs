//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// azsync - ordered migration scripts for Azure SQL schemas
#[derive(Parser, Debug)]
#[command(name = "azs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a migration from the deployed schema to the desired one
    Plan(PlanArgs),

    /// Report drift between the desired and deployed schema
    Diff(DiffArgs),

    /// Show the dependency order of a schema tree
    Deps(DepsArgs),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Desired schema tree (default: sql_schema_dir from config)
    #[arg(long)]
    pub desired: Option<String>,

    /// Schema tree exported from the deployed database
    #[arg(long)]
    pub actual: String,

    /// Directory receiving numbered migration files
    #[arg(long)]
    pub migrations_dir: Option<String>,

    /// Schema name shown in the script header
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Print the script instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Fail instead of warning when dependencies form a cycle
    #[arg(long)]
    pub fail_on_cycle: bool,
}

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Desired schema tree (default: sql_schema_dir from config)
    #[arg(long)]
    pub desired: Option<String>,

    /// Schema tree exported from the deployed database
    #[arg(long)]
    pub actual: String,

    /// Also list unchanged objects
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Schema tree to inspect (default: sql_schema_dir from config)
    #[arg(long)]
    pub dir: Option<String>,

    /// Only show one object, e.g. `dbo.v_orders`
    #[arg(long)]
    pub object: Option<String>,

    /// Print drop order (dependents first)
    #[arg(long)]
    pub reverse: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
