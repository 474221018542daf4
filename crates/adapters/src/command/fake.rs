// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake command runner for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CommandError, CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    pub command: String,
    pub env: Vec<(String, String)>,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<CommandCall>,
    /// Exit codes keyed by command prefix
    exit_codes: HashMap<String, i32>,
    running: usize,
    max_running: usize,
}

/// Fake command runner that records commands instead of running them
#[derive(Clone, Default)]
pub struct FakeCommandRunner {
    state: Arc<Mutex<FakeState>>,
    delay: Option<Duration>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every command for `delay` so concurrency can be observed
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Exit with `code` for commands starting with `prefix`
    pub fn fail_with(&self, prefix: &str, code: i32) {
        self.lock().exit_codes.insert(prefix.to_string(), code);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CommandCall> {
        self.lock().calls.clone()
    }

    /// Highest number of commands that were running at once
    pub fn max_concurrency(&self) -> usize {
        self.lock().max_running
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(
        &self,
        command: &str,
        env: &[(String, String)],
    ) -> Result<CommandOutput, CommandError> {
        if command.trim().is_empty() {
            return Err(CommandError::Empty);
        }
        let exit_code = {
            let mut state = self.lock();
            state.calls.push(CommandCall {
                command: command.to_string(),
                env: env.to_vec(),
            });
            state.running += 1;
            state.max_running = state.max_running.max(state.running);
            state
                .exit_codes
                .iter()
                .find(|(prefix, _)| command.starts_with(prefix.as_str()))
                .map(|(_, code)| *code)
                .unwrap_or(0)
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.lock().running -= 1;
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: if exit_code == 0 {
                String::new()
            } else {
                format!("exit status {exit_code}")
            },
            exit_code,
        })
    }
}
