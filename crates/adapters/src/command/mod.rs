// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command execution adapters

mod process;

pub use process::ProcessCommandRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CommandCall, FakeCommandRunner};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from starting a command
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("failed to run {command:?}: {message}")]
    Spawn { command: String, message: String },
}

/// Output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was killed by a signal
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs action commands
#[async_trait]
pub trait CommandRunner: Clone + Send + Sync + 'static {
    /// Run a shell command line with extra environment variables
    async fn run(&self, command: &str, env: &[(String, String)])
        -> Result<CommandOutput, CommandError>;
}
