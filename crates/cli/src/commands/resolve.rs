// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reg resolve <manifest>` - Plan and run the actions a manifest calls for

use crate::config::GlobalArgs;
use crate::error::CliError;
use crate::output::{print, print_list, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use reg_adapters::{
    HttpRegistryAdapter, ProcessCommandRunner, TracedCommandRunner, TracedRegistryAdapter,
};
use reg_core::{Action, SystemClock};
use reg_engine::{
    execute_actions, Controller, TaskPool, TaskReport, DEFAULT_JOBS, RESOLVE_DEPTH_ENV,
};
use reg_manifest::load_manifest;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ResolveArgs {
    /// Manifest file (TOML)
    pub manifest: PathBuf,

    /// Print the planned actions without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Actions to run at once
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct PlannedAction<'a> {
    generated_resource: &'a str,
    command: &'a str,
    requires_receipt: bool,
}

impl<'a> From<&'a Action> for PlannedAction<'a> {
    fn from(action: &'a Action) -> Self {
        Self {
            generated_resource: &action.generated_resource,
            command: &action.command,
            requires_receipt: action.requires_receipt,
        }
    }
}

impl fmt::Display for PlannedAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.generated_resource, self.command)
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    succeeded: usize,
    failed: Vec<Failure<'a>>,
}

#[derive(Serialize)]
struct Failure<'a> {
    command: &'a str,
    error: String,
}

impl<'a> Summary<'a> {
    fn new(reports: &'a [TaskReport]) -> Self {
        let failed = reports
            .iter()
            .filter_map(|report| {
                report.result.as_ref().err().map(|e| Failure {
                    command: &report.description,
                    error: e.to_string(),
                })
            })
            .collect::<Vec<_>>();
        Self {
            succeeded: reports.len() - failed.len(),
            failed,
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failed {
            writeln!(f, "FAILED {}\n  {}", failure.command, failure.error)?;
        }
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed.len())
    }
}

/// Nesting depth inherited from a parent run, 0 at top level
fn resolve_depth() -> u32 {
    std::env::var(RESOLVE_DEPTH_ENV)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

pub async fn handle(args: ResolveArgs, global: &GlobalArgs) -> Result<()> {
    let depth = resolve_depth();
    if depth > 0 {
        return Err(CliError::nested_resolve(depth).into());
    }

    let manifest = load_manifest(&args.manifest)
        .with_context(|| format!("loading {}", args.manifest.display()))?;
    let project = global.project()?;

    let registry = TracedRegistryAdapter::new(HttpRegistryAdapter::new(&global.registry_config()));
    let controller = Controller::new(registry.clone(), SystemClock, project);
    let actions = controller.process_manifest(&manifest).await;
    tracing::info!(manifest = %manifest.id, actions = actions.len(), "planned");

    if args.dry_run {
        let planned: Vec<PlannedAction<'_>> = actions.iter().map(PlannedAction::from).collect();
        print_list(&planned, args.format);
        return Ok(());
    }

    let runner = TracedCommandRunner::new(ProcessCommandRunner::new());
    let total = actions.len();
    let pool = TaskPool::new(args.jobs);
    let reports = execute_actions(&pool, &registry, &runner, depth, actions).await;

    let summary = Summary::new(&reports);
    print(&summary, args.format);
    if !summary.failed.is_empty() {
        return Err(CliError::failed_actions(summary.failed.len(), total).into());
    }
    Ok(())
}
