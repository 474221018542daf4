// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use reg_adapters::{CommandError, RegistryError};
use reg_core::PatternError;
use reg_manifest::ValidationError;
use thiserror::Error;

/// Errors that cause one rule to be skipped
#[derive(Debug, Clone, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("no resources match dependency {pattern}")]
    NoDependencyResources { pattern: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<ValidationError> for ControllerError {
    fn from(error: ValidationError) -> Self {
        ControllerError::Configuration(error.to_string())
    }
}

/// Errors from running one action
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("refusing to run {0:?}: it would resolve a manifest recursively")]
    Rejected(String),

    #[error("{command:?} exited with status {exit_code}: {stderr}")]
    Command {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error(transparent)]
    Spawn(#[from] CommandError),

    #[error("receipt target {0} is not an artifact")]
    ReceiptTarget(String),

    #[error("command succeeded but the receipt write failed: {0}")]
    ReceiptWrite(RegistryError),

    #[error("task aborted: {0}")]
    Aborted(String),
}
