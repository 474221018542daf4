// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linter plugin protocol
//!
//! A linter named `x` is an executable `registry-lint-x` on the `PATH`. It
//! reads a JSON [`LinterRequest`] on stdin and writes a JSON
//! [`LinterResponse`] on stdout. Its stderr is diagnostic output only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Executable name prefix for linter plugins
pub const LINTER_PREFIX: &str = "registry-lint";

/// Errors from running a linter plugin
#[derive(Debug, Error)]
pub enum LinterError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with status {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },
    #[error("invalid response from {program}: {source}")]
    Decode {
        program: String,
        source: serde_json::Error,
    },
    #[error("{program} reported errors: {}", errors.join("; "))]
    Plugin {
        program: String,
        errors: Vec<String>,
    },
}

/// Request sent to a linter plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterRequest {
    pub spec_directory: String,
    #[serde(default)]
    pub rule_ids: Vec<String>,
}

/// Response from a linter plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterResponse {
    #[serde(default)]
    pub lint: Option<Lint>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Problems found by one linter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    pub name: String,
    #[serde(default)]
    pub files: Vec<LintFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFile {
    pub file_path: String,
    #[serde(default)]
    pub problems: Vec<LintProblem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintProblem {
    pub message: String,
    #[serde(default)]
    pub rule_id: String,
    #[serde(default)]
    pub rule_doc_uri: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub location: Option<LintLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintLocation {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// A linter plugin executable
#[derive(Debug, Clone)]
pub struct LinterPlugin {
    program: PathBuf,
}

impl LinterPlugin {
    /// Plugin for linter `name`, resolved on the `PATH`
    pub fn named(name: &str) -> Self {
        Self {
            program: PathBuf::from(format!("{LINTER_PREFIX}-{name}")),
        }
    }

    /// Plugin at an explicit path
    pub fn at(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> String {
        self.program.display().to_string()
    }

    /// Run the plugin on one request
    pub async fn run(&self, request: &LinterRequest) -> Result<LinterResponse, LinterError> {
        let program = self.program();
        let spawn_error = |source| LinterError::Spawn {
            program: program.clone(),
            source,
        };

        let input = serde_json::to_vec(request).map_err(|source| LinterError::Decode {
            program: program.clone(),
            source,
        })?;

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input).await.map_err(spawn_error)?;
            // Dropping stdin closes it so the plugin sees EOF
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !stderr.is_empty() {
            tracing::debug!(program = %program, stderr = %stderr.trim_end(), "linter stderr");
        }
        if !output.status.success() {
            return Err(LinterError::Exit {
                program,
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let response: LinterResponse =
            serde_json::from_slice(&output.stdout).map_err(|source| LinterError::Decode {
                program: program.clone(),
                source,
            })?;
        if !response.errors.is_empty() {
            return Err(LinterError::Plugin {
                program,
                errors: response.errors,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
#[path = "linter_tests.rs"]
mod tests;
