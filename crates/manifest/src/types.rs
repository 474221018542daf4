// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest definitions

use std::time::Duration;

/// A set of generated-resource rules for one project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub id: String,
    pub generated_resources: Vec<GeneratedResourceRule>,
}

/// How one family of derived resources is produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedResourceRule {
    /// Target pattern, relative to the project unless it starts with `projects/`
    pub pattern: String,
    pub dependencies: Vec<Dependency>,
    /// Command template run to regenerate a target
    pub action: String,
    /// Record success with an empty receipt artifact at the target
    pub receipt: bool,
    /// Regenerate targets whose receipt is older than this
    pub refresh: Option<Duration>,
}

impl GeneratedResourceRule {
    pub fn new(pattern: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn depends_on(mut self, pattern: impl Into<String>) -> Self {
        self.dependencies.push(Dependency::new(pattern));
        self
    }

    pub fn depends_on_filtered(
        mut self,
        pattern: impl Into<String>,
        filter: impl Into<String>,
    ) -> Self {
        self.dependencies.push(Dependency {
            pattern: pattern.into(),
            filter: filter.into(),
        });
        self
    }

    pub fn with_receipt(mut self, refresh: Option<Duration>) -> Self {
        self.receipt = true;
        self.refresh = refresh;
        self
    }
}

/// Resources whose changes make a target stale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    pub pattern: String,
    /// Registry filter expression, passed through verbatim
    pub filter: String,
}

impl Dependency {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            filter: String::new(),
        }
    }
}
