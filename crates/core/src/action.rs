// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions planned by the controller

use serde::Serialize;
use std::fmt;

/// A command that regenerates one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub command: String,
    pub generated_resource: String,
    /// Write a receipt artifact at `generated_resource` once the command succeeds
    pub requires_receipt: bool,
}

impl Action {
    pub fn new(command: impl Into<String>, generated_resource: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            generated_resource: generated_resource.into(),
            requires_receipt: false,
        }
    }

    pub fn with_receipt(mut self, requires_receipt: bool) -> Self {
        self.requires_receipt = requires_receipt;
        self
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}
