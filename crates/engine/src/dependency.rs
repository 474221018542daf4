// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Freshness of each dependency, grouped by shared ancestor

use crate::error::ControllerError;
use crate::lister::list_resources;
use chrono::{DateTime, Utc};
use reg_adapters::RegistryAdapter;
use reg_core::{extend, group_key, GroupKey, ProjectName, ResourceName};
use reg_manifest::Dependency;
use std::collections::BTreeMap;

/// Newest change within one group of dependency resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    pub update_time: DateTime<Utc>,
    /// First resource listed in the group
    pub representative: ResourceName,
}

/// Groups of one dependency's resources, keyed by shared ancestor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    /// The dependency pattern as written in the rule
    pub pattern: String,
    pub groups: BTreeMap<GroupKey, DependencyGroup>,
}

impl DependencyMap {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            groups: BTreeMap::new(),
        }
    }

    /// Fold a resource into its group, keeping the newest time
    pub fn record(&mut self, key: GroupKey, name: &ResourceName, update_time: DateTime<Utc>) {
        self.groups
            .entry(key)
            .and_modify(|group| {
                if update_time > group.update_time {
                    group.update_time = update_time;
                }
            })
            .or_insert_with(|| DependencyGroup {
                update_time,
                representative: name.clone(),
            });
    }

    pub fn get(&self, key: &GroupKey) -> Option<&DependencyGroup> {
        self.groups.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// List a dependency relative to a target pattern and group what it matches
///
/// `target` must already be qualified with its project. Dependencies without
/// a `$resource` reference are qualified with `project` and collapse into
/// the single [`GroupKey::Global`] group.
pub async fn build_dependency_map<R: RegistryAdapter>(
    registry: &R,
    project: &ProjectName,
    target: &str,
    dependency: &Dependency,
) -> Result<DependencyMap, ControllerError> {
    let extended = project.qualify(&extend(target, &dependency.pattern)?);
    let resources = list_resources(registry, &extended, &dependency.filter).await?;
    if resources.is_empty() {
        return Err(ControllerError::NoDependencyResources { pattern: extended });
    }

    let mut map = DependencyMap::new(&dependency.pattern);
    for resource in &resources {
        let key = group_key(&dependency.pattern, &resource.name)?;
        map.record(key, &resource.name, resource.update_time);
    }
    tracing::debug!(
        dependency = %dependency.pattern,
        resources = resources.len(),
        groups = map.len(),
        "built dependency map"
    );
    Ok(map)
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
