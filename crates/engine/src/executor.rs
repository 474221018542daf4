// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-concurrency execution of planned actions

use crate::error::TaskError;
use async_trait::async_trait;
use reg_adapters::{upsert_artifact, CommandRunner, RegistryAdapter, RECEIPT_MIME_TYPE};
use reg_core::{Action, ResourceName};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Workers used when none are configured
pub const DEFAULT_JOBS: usize = 10;

/// Environment variable carrying the resolve nesting depth to actions
pub const RESOLVE_DEPTH_ENV: &str = "REG_RESOLVE_DEPTH";

/// Verb that starts a manifest run
const RESOLVE_VERB: &str = "resolve";

/// Program names that dispatch [`RESOLVE_VERB`]
const PROGRAMS: [&str; 2] = ["reg", "registry"];

/// A unit of work for the pool
#[async_trait]
pub trait Task: fmt::Display + Send + Sync + 'static {
    async fn run(&self) -> Result<(), TaskError>;
}

/// Outcome of one task
#[derive(Debug)]
pub struct TaskReport {
    pub description: String,
    pub result: Result<(), TaskError>,
}

impl TaskReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs tasks on at most `jobs` workers at a time
#[derive(Debug, Clone, Copy)]
pub struct TaskPool {
    jobs: usize,
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new(DEFAULT_JOBS)
    }
}

impl TaskPool {
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run every task once and wait for all of them
    ///
    /// Reports come back in submission order. A failing or panicking task
    /// never stops its siblings.
    pub async fn run_all<T: Task>(&self, tasks: Vec<T>) -> Vec<TaskReport> {
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let descriptions: Vec<String> = tasks.iter().map(|t| t.to_string()).collect();
        let mut set = JoinSet::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let span = tracing::info_span!("task", index);
            set.spawn(
                async move {
                    let result = match semaphore.acquire_owned().await {
                        Ok(_permit) => task.run().await,
                        Err(e) => Err(TaskError::Aborted(e.to_string())),
                    };
                    (index, result)
                }
                .instrument(span),
            );
        }

        let mut results: Vec<Option<Result<(), TaskError>>> =
            descriptions.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Err(e) = &result {
                        tracing::warn!(task = %descriptions[index], error = %e, "task failed");
                    }
                    if let Some(slot) = results.get_mut(index) {
                        *slot = Some(result);
                    }
                }
                Err(e) => tracing::error!(error = %e, "task panicked"),
            }
        }

        descriptions
            .into_iter()
            .zip(results)
            .map(|(description, result)| TaskReport {
                description,
                result: result.unwrap_or_else(|| Err(TaskError::Aborted("task panicked".into()))),
            })
            .collect()
    }
}

/// Reject commands that would start another manifest run
///
/// Each simple command of the shell line is checked. A command is recursive
/// when, after any `VAR=value` assignments and wrappers such as `env`, it is
/// `resolve ...` or this tool under any of its names with `resolve` as the
/// first word after its global options.
pub fn check_recursion(command: &str) -> Result<(), TaskError> {
    if shell_commands(command).any(starts_resolve) {
        return Err(TaskError::Rejected(command.to_string()));
    }
    Ok(())
}

/// Words that run the rest of the line as a command
const WRAPPERS: [&str; 5] = ["env", "exec", "command", "nohup", "time"];

/// Global options of this tool that take a separate value
const VALUE_OPTIONS: [&str; 4] = ["--address", "--token", "--project", "--timeout"];

/// Simple commands of a shell line, split at operators and subshell brackets
fn shell_commands(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c| matches!(c, ';' | '|' | '&' | '\n' | '(' | ')' | '`' | '{' | '}'))
}

fn starts_resolve(command: &str) -> bool {
    let mut words = command
        .split_whitespace()
        .map(|w| w.trim_matches(|c| c == '\'' || c == '"'))
        .skip_while(|w| is_assignment(w) || WRAPPERS.contains(w));
    let Some(first) = words.next() else {
        return false;
    };
    if first == RESOLVE_VERB {
        return true;
    }
    let program = Path::new(first)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(first);
    if !PROGRAMS.contains(&program) {
        return false;
    }
    while let Some(word) = words.next() {
        if VALUE_OPTIONS.contains(&word) {
            words.next();
        } else if !word.starts_with('-') {
            return word == RESOLVE_VERB;
        }
    }
    false
}

/// `NAME=value` shell assignment
fn is_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && !name.starts_with(|c: char| c.is_ascii_digit())
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Runs one action's command and writes its receipt
pub struct CommandTask<R, C> {
    action: Action,
    registry: R,
    runner: C,
    depth: u32,
}

impl<R: RegistryAdapter, C: CommandRunner> CommandTask<R, C> {
    /// Wrap an action, refusing recursive commands up front
    ///
    /// `depth` is the nesting depth of the current run; the command sees
    /// one more than that.
    pub fn new(action: Action, registry: R, runner: C, depth: u32) -> Result<Self, TaskError> {
        check_recursion(&action.command)?;
        Ok(Self {
            action,
            registry,
            runner,
            depth,
        })
    }

    async fn write_receipt(&self) -> Result<(), TaskError> {
        let target = &self.action.generated_resource;
        let name = match ResourceName::parse(target) {
            Ok(ResourceName::Artifact(name)) => name,
            _ => return Err(TaskError::ReceiptTarget(target.clone())),
        };
        upsert_artifact(&self.registry, &name, RECEIPT_MIME_TYPE)
            .await
            .map_err(TaskError::ReceiptWrite)
    }
}

impl<R, C> fmt::Display for CommandTask<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action.command)
    }
}

#[async_trait]
impl<R: RegistryAdapter, C: CommandRunner> Task for CommandTask<R, C> {
    async fn run(&self) -> Result<(), TaskError> {
        let env = [(RESOLVE_DEPTH_ENV.to_string(), (self.depth + 1).to_string())];
        let output = self.runner.run(&self.action.command, &env).await?;
        if !output.success() {
            return Err(TaskError::Command {
                command: self.action.command.clone(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        if self.action.requires_receipt {
            self.write_receipt().await?;
        }
        tracing::info!(resource = %self.action.generated_resource, "generated");
        Ok(())
    }
}

/// Run actions on `pool`, returning one report per action
///
/// Actions rejected by the recursion guard are reported as failures without
/// being run.
pub async fn execute_actions<R: RegistryAdapter, C: CommandRunner>(
    pool: &TaskPool,
    registry: &R,
    runner: &C,
    depth: u32,
    actions: Vec<Action>,
) -> Vec<TaskReport> {
    let mut rejected = Vec::new();
    let mut tasks = Vec::with_capacity(actions.len());
    for action in actions {
        let command = action.command.clone();
        match CommandTask::new(action, registry.clone(), runner.clone(), depth) {
            Ok(task) => tasks.push(task),
            Err(e) => {
                tracing::warn!(%command, error = %e, "rejected action");
                rejected.push(TaskReport {
                    description: command,
                    result: Err(e),
                });
            }
        }
    }

    let mut reports = pool.run_all(tasks).await;
    reports.extend(rejected);
    reports
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
