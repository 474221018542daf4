// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reg lint <spec-dir> --linter <name>` - Run a linter plugin

use anyhow::{Context, Result};
use clap::Args;
use reg_adapters::{LinterPlugin, LinterRequest};
use std::path::PathBuf;

#[derive(Args)]
pub struct LintArgs {
    /// Directory holding the spec files
    pub spec_dir: PathBuf,

    /// Linter name; runs `registry-lint-<name>` from the PATH
    #[arg(long, required_unless_present = "plugin")]
    pub linter: Option<String>,

    /// Linter executable to run instead of looking one up by name
    #[arg(long, conflicts_with = "linter")]
    pub plugin: Option<PathBuf>,

    /// Only report these rules
    #[arg(long = "rule")]
    pub rules: Vec<String>,
}

pub async fn handle(args: LintArgs) -> Result<()> {
    let plugin = match (args.plugin, args.linter) {
        (Some(path), _) => LinterPlugin::at(path),
        (None, Some(name)) => LinterPlugin::named(&name),
        (None, None) => anyhow::bail!("either --linter or --plugin is required"),
    };
    let request = LinterRequest {
        spec_directory: args.spec_dir.display().to_string(),
        rule_ids: args.rules,
    };

    let response = plugin
        .run(&request)
        .await
        .with_context(|| format!("linting {}", request.spec_directory))?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
