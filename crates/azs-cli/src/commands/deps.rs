//! Deps command: print the dependency order of a schema tree

use anyhow::{Context, Result};
use azs_catalog::{fetch_snapshot, FileCatalog};
use azs_core::{ConfigOverrides, CoreError, DependencyGraph, ObjectIdentity, TopologicalOrder};
use azs_migrate::MigrationPlanner;
use serde::Serialize;

use crate::cli::{DepsArgs, GlobalArgs, OutputFormat};
use crate::commands::common::resolve_config;

/// One object in dependency order
#[derive(Debug, Serialize)]
struct DepsEntry {
    position: usize,
    kind: Option<String>,
    object: String,
    depends_on: Vec<String>,
    dependents: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DepsReport {
    objects: Vec<DepsEntry>,
    unordered: Vec<String>,
}

/// Execute the deps command
pub(crate) async fn execute(args: &DepsArgs, global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(
        global,
        &ConfigOverrides {
            sql_schema_dir: args.dir.clone(),
            ..Default::default()
        },
    )?;

    let only = match &args.object {
        Some(name) => Some(
            ObjectIdentity::parse(name, &config.default_schema)
                .ok_or_else(|| CoreError::InvalidObjectName { name: name.clone() })?,
        ),
        None => None,
    };

    let catalog = FileCatalog::new(&config.sql_schema_dir, &config.default_schema);
    let snapshot = fetch_snapshot(&catalog)
        .await
        .with_context(|| format!("Failed to read {}", config.sql_schema_dir.display()))?;
    let graph = MigrationPlanner::new().build_graph(&snapshot);

    if let Some(identity) = &only {
        if !graph.contains(identity) {
            anyhow::bail!("Object '{}' not found in {}", identity, config.sql_schema_dir.display());
        }
    }

    let order = if args.reverse {
        graph.reverse_topological_order()
    } else {
        graph.topological_order()
    };
    let report = build_report(&graph, &order, only.as_ref());

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for entry in &report.objects {
                let kind = entry.kind.as_deref().unwrap_or("?");
                if entry.depends_on.is_empty() {
                    println!("{:>4}. {} {}", entry.position, kind, entry.object);
                } else {
                    println!(
                        "{:>4}. {} {} -> {}",
                        entry.position,
                        kind,
                        entry.object,
                        entry.depends_on.join(", ")
                    );
                }
            }
            if let Some(warning) = &order.warning {
                println!("Warning: {}", warning);
            }
        }
    }
    Ok(())
}

fn build_report(
    graph: &DependencyGraph,
    order: &TopologicalOrder,
    only: Option<&ObjectIdentity>,
) -> DepsReport {
    let names = |ids: Vec<ObjectIdentity>| -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    };
    let objects = order
        .order
        .iter()
        .enumerate()
        .filter(|(_, identity)| only.map_or(true, |o| o == *identity))
        .map(|(index, identity)| DepsEntry {
            position: index + 1,
            kind: graph.kind(identity).map(|k| k.label().to_string()),
            object: identity.to_string(),
            depends_on: names(graph.dependencies(identity)),
            dependents: names(graph.dependents(identity)),
        })
        .collect();
    let unordered = order
        .warning
        .as_ref()
        .map(|w| w.unresolved.iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    DepsReport { objects, unordered }
}
