//! Diff command: report drift between the desired and deployed schema

use anyhow::Result;
use azs_core::ConfigOverrides;
use azs_migrate::{PlanEntry, PlanReport};
use chrono::Utc;

use crate::cli::{DiffArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{resolve_config, ExitCode};
use crate::commands::plan::build_plan;

/// Execute the diff command; exits 1 when any object differs
pub(crate) async fn execute(args: &DiffArgs, global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(
        global,
        &ConfigOverrides {
            sql_schema_dir: args.desired.clone(),
            ..Default::default()
        },
    )?;
    let plan = build_plan(&config, &args.actual).await?;

    match args.output {
        OutputFormat::Json => {
            let report = PlanReport::from_plan(
                &plan,
                config.schema_name.as_deref(),
                Utc::now(),
                args.all,
            );
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text => {
            for entry in &plan.entries {
                println!("{}", format_entry(entry));
            }
            if args.all {
                for entry in &plan.unchanged {
                    println!("{}", format_entry(entry));
                }
            }
            let total = plan.summary.total();
            println!(
                "\n{} created, {} updated, {} dropped, {} unchanged",
                total.created, total.updated, total.dropped, total.unchanged
            );
            for warning in &plan.diagnostics.cycle_warnings {
                println!("Warning: {}", warning);
            }
        }
    }

    if !plan.is_empty() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn format_entry(entry: &PlanEntry) -> String {
    format!(
        "  {:<9} {:<10} {}",
        entry.change().to_string(),
        entry.kind().label(),
        entry.identity()
    )
}
