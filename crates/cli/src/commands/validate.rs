// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reg validate <manifest>` - Check a manifest's rules

use crate::config::GlobalArgs;
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use reg_core::{ProjectName, WILDCARD};
use reg_manifest::{load_manifest, validate_manifest};
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Manifest file (TOML)
    pub manifest: PathBuf,
}

pub fn handle(args: ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let path = args.manifest.display().to_string();
    let manifest = load_manifest(&args.manifest).with_context(|| format!("loading {path}"))?;

    // Any project will do when none is configured; only pattern shapes are checked
    let project = global
        .project()
        .unwrap_or_else(|_| ProjectName::new(WILDCARD));

    let errors = validate_manifest(&project, &manifest);
    if errors.is_empty() {
        let count = manifest.generated_resources.len();
        let noun = if count == 1 { "rule" } else { "rules" };
        println!("{path}: {count} {noun} ok");
        return Ok(());
    }

    for error in &errors {
        println!("{path}: {error}");
    }
    Err(CliError::invalid_manifest(&path, errors.len()).into())
}
