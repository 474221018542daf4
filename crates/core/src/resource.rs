// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resources returned by the registry

use crate::name::{ResourceKind, ResourceName};
use chrono::{DateTime, Utc};

/// A listed resource and the time it last changed
///
/// For specs and deployments this is the revision update time, since a new
/// revision is what makes derived artifacts stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInstance {
    pub name: ResourceName,
    pub update_time: DateTime<Utc>,
}

impl ResourceInstance {
    pub fn new(name: ResourceName, update_time: DateTime<Utc>) -> Self {
        Self { name, update_time }
    }

    /// Full name of the ancestor of `kind`, or `None` when there is none
    pub fn ancestor_key(&self, kind: ResourceKind) -> Option<String> {
        self.name.ancestor(kind).map(|a| a.to_string())
    }
}
