// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with context and suggestions

use std::fmt;

/// Error with context and recovery suggestions for display on stderr
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// No project was given for a command that needs one
    pub fn missing_project() -> Self {
        CliError::new("no registry project configured")
            .with_context("manifest patterns are resolved relative to a project")
            .with_suggestion("pass --project <id>")
            .with_suggestion("or set REGISTRY_PROJECT")
    }

    /// `reg resolve` was started by an action of another run
    pub fn nested_resolve(depth: u32) -> Self {
        CliError::new("refusing to resolve a manifest from inside an action")
            .with_context(format!("REG_RESOLVE_DEPTH is {depth}"))
            .with_suggestion("remove `reg resolve` from the manifest's actions")
    }

    /// A manifest failed validation
    pub fn invalid_manifest(path: &str, count: usize) -> Self {
        let noun = if count == 1 { "problem" } else { "problems" };
        CliError::new(format!("{path} has {count} {noun}"))
            .with_suggestion(format!("fix the rules listed above and rerun: reg validate {path}"))
    }

    /// Some actions of a run failed
    pub fn failed_actions(failed: usize, total: usize) -> Self {
        CliError::new(format!("{failed} of {total} actions failed"))
            .with_context("successful actions were kept; there is no rollback")
            .with_suggestion("rerun with -v to see each command's output")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}
