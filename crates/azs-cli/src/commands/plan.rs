//! Plan command: write the next numbered migration script

use anyhow::{Context, Result};
use azs_catalog::FileCatalog;
use azs_core::{ConfigOverrides, ResolvedConfig};
use azs_migrate::{render_script, write_migration, MigrationPlan, MigrationPlanner, PlanReport};
use azs_sql::ColumnAlterGenerator;
use chrono::Utc;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::resolve_config;

/// Execute the plan command
pub(crate) async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(
        global,
        &ConfigOverrides {
            schema_name: args.schema.clone(),
            sql_schema_dir: args.desired.clone(),
            migrations_dir: args.migrations_dir.clone(),
            fail_on_cycle: args.fail_on_cycle,
        },
    )?;

    let plan = build_plan(&config, &args.actual).await?;

    let generated_at = Utc::now();
    let written = if plan.is_empty() || args.dry_run {
        None
    } else {
        let script = render_script(&plan, config.schema_name.as_deref(), generated_at);
        Some(write_migration(&config.migrations_dir, &script).context("Failed to write migration")?)
    };

    match args.output {
        OutputFormat::Json => {
            let report = PlanReport::from_plan(
                &plan,
                config.schema_name.as_deref(),
                generated_at,
                false,
            );
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text if plan.is_empty() => {
            println!("No changes detected. Migration not created.");
        }
        OutputFormat::Text => match written {
            Some(path) => println!(
                "Migration written to {} ({} change(s))",
                path.display(),
                plan.entries.len()
            ),
            None => print!(
                "{}",
                render_script(&plan, config.schema_name.as_deref(), generated_at)
            ),
        },
    }

    Ok(())
}

/// Plan from the exported tree at `actual` to the configured desired tree
pub(crate) async fn build_plan(config: &ResolvedConfig, actual: &str) -> Result<MigrationPlan> {
    let desired = FileCatalog::new(&config.sql_schema_dir, &config.default_schema);
    let actual = FileCatalog::new(actual, &config.default_schema);

    MigrationPlanner::new()
        .with_table_alter(ColumnAlterGenerator)
        .fail_on_cycle(config.fail_on_cycle)
        .plan_catalogs(&desired, &actual)
        .await
        .context("Failed to plan migration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use azs_core::ChangeKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, folder: &str, file: &str, content: &str) {
        let dir = root.join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    fn config(desired: &std::path::Path, fail_on_cycle: bool) -> ResolvedConfig {
        ResolvedConfig {
            schema_name: Some("dbo".to_string()),
            sql_schema_dir: desired.to_path_buf(),
            migrations_dir: PathBuf::from("unused"),
            default_schema: "dbo".to_string(),
            fail_on_cycle,
        }
    }

    #[tokio::test]
    async fn test_table_changes_become_alter_statements() {
        let desired = TempDir::new().unwrap();
        let actual = TempDir::new().unwrap();
        write(desired.path(), "Tables", "dbo.T.sql", "CREATE TABLE dbo.T (id int, note nvarchar(50))");
        write(actual.path(), "Tables", "dbo.T.sql", "CREATE TABLE dbo.T (id int)");

        let plan = build_plan(
            &config(desired.path(), false),
            &actual.path().display().to_string(),
        )
        .await
        .unwrap();

        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].change(), ChangeKind::Updated);
        assert_eq!(
            plan.entries[0].statement().as_deref(),
            Some("ALTER TABLE [dbo].[T] ADD note nvarchar(50);")
        );
    }

    #[tokio::test]
    async fn test_fail_on_cycle_is_an_error() {
        let desired = TempDir::new().unwrap();
        let actual = TempDir::new().unwrap();
        write(desired.path(), "Views", "dbo.A.sql", "CREATE VIEW dbo.A AS SELECT * FROM dbo.B");
        write(desired.path(), "Views", "dbo.B.sql", "CREATE VIEW dbo.B AS SELECT * FROM dbo.A");

        let actual = actual.path().display().to_string();
        assert!(build_plan(&config(desired.path(), false), &actual).await.is_ok());
        let err = build_plan(&config(desired.path(), true), &actual).await.unwrap_err();
        assert!(format!("{:#}", err).contains("[C004]"));
    }
}
