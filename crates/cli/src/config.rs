// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global options shared by every command

use crate::error::CliError;
use clap::Args;
use reg_adapters::RegistryConfig;
use reg_core::ProjectName;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Registry HTTP endpoint
    #[arg(
        long,
        global = true,
        env = "REGISTRY_ADDRESS",
        default_value = "http://localhost:8080"
    )]
    pub address: String,

    /// Bearer token sent with every registry request
    #[arg(long, global = true, env = "REGISTRY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Project that manifest patterns are relative to
    #[arg(long, global = true, env = "REGISTRY_PROJECT")]
    pub project: Option<String>,

    /// Timeout for each registry request
    #[arg(long, global = true, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            address: self.address.clone(),
            token: self.token.clone(),
            timeout: self.timeout,
        }
    }

    /// The configured project, which commands that talk to the registry need
    pub fn project(&self) -> Result<ProjectName, CliError> {
        match self.project.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(ProjectName::new(id)),
            _ => Err(CliError::missing_project()),
        }
    }
}
