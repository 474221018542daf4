// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess command runner

use super::{CommandError, CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Runs commands through `sh -c`
///
/// The child is killed if the returned future is dropped, so cancelling a
/// task cancels its subprocess.
#[derive(Clone, Default)]
pub struct ProcessCommandRunner {
    cwd: Option<PathBuf>,
}

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(cwd: PathBuf) -> Self {
        Self { cwd: Some(cwd) }
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        command: &str,
        env: &[(String, String)],
    ) -> Result<CommandOutput, CommandError> {
        if command.trim().is_empty() {
            return Err(CommandError::Empty);
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await.map_err(|e| CommandError::Spawn {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
