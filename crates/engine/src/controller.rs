// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action planning for generated-resource rules
//!
//! Each rule is planned in two passes. The update pass walks targets that
//! already exist and acts on those older than a dependency group they
//! belong to. The create pass walks dependency groups no existing target
//! covered and synthesizes the missing targets. Rules without dependencies
//! are gated on the age of the target itself (usually a receipt).

use crate::dependency::{build_dependency_map, DependencyMap};
use crate::error::ControllerError;
use crate::lister::list_resources;
use reg_adapters::RegistryAdapter;
use reg_core::pattern::{mentions_resource, substitute, Reference};
use reg_core::{
    group_key, render, Action, Clock, GroupKey, Pattern, PatternError, ProjectName,
    ResourceInstance, ResourceKind, ResourceName,
};
use reg_manifest::{validate_rule, GeneratedResourceRule, Manifest};
use std::collections::{BTreeMap, BTreeSet};
use tracing::Instrument;

/// Plans actions for the rules of a manifest
pub struct Controller<R, C> {
    registry: R,
    clock: C,
    project: ProjectName,
}

impl<R: RegistryAdapter, C: Clock> Controller<R, C> {
    pub fn new(registry: R, clock: C, project: ProjectName) -> Self {
        Self {
            registry,
            clock,
            project,
        }
    }

    /// Plan every rule in order
    ///
    /// A rule that fails is logged and skipped; the others still run.
    pub async fn process_manifest(&self, manifest: &Manifest) -> Vec<Action> {
        let mut actions = Vec::new();
        for rule in &manifest.generated_resources {
            let span = tracing::info_span!("rule", pattern = %rule.pattern);
            match self.process_rule(rule).instrument(span).await {
                Ok(planned) => {
                    tracing::info!(
                        pattern = %rule.pattern,
                        actions = planned.len(),
                        "planned rule"
                    );
                    actions.extend(planned);
                }
                Err(e) => tracing::warn!(pattern = %rule.pattern, error = %e, "skipping rule"),
            }
        }
        actions
    }

    /// Plan one rule
    pub async fn process_rule(
        &self,
        rule: &GeneratedResourceRule,
    ) -> Result<Vec<Action>, ControllerError> {
        if let Some(error) = validate_rule(&self.project, rule).into_iter().next() {
            return Err(error.into());
        }
        let target = self.project.qualify(&rule.pattern);
        if rule.dependencies.is_empty() {
            return self.refresh_targets(rule, &target).await;
        }

        let mut maps = Vec::with_capacity(rule.dependencies.len());
        for dependency in &rule.dependencies {
            let map = build_dependency_map(&self.registry, &self.project, &target, dependency);
            maps.push(map.await?);
        }

        let existing = list_resources(&self.registry, &target, "").await?;
        let (mut actions, visited) = self.update_existing(rule, &existing, &maps)?;
        tracing::debug!(existing = existing.len(), updates = actions.len(), "update pass");

        match self.create_missing(rule, &target, &existing, &maps, &visited).await {
            Ok(created) => {
                tracing::debug!(creates = created.len(), "create pass");
                actions.extend(created);
            }
            Err(e) => tracing::warn!(error = %e, "create pass failed, keeping updates"),
        }
        Ok(actions)
    }

    /// Act on existing targets that are older than any of their groups
    fn update_existing(
        &self,
        rule: &GeneratedResourceRule,
        existing: &[ResourceInstance],
        maps: &[DependencyMap],
    ) -> Result<(Vec<Action>, BTreeSet<GroupKey>), ControllerError> {
        let mut visited = BTreeSet::new();
        let mut actions = Vec::new();

        for resource in existing {
            let mut stale = false;
            let mut sources = Vec::with_capacity(maps.len());
            for map in maps {
                let key = group_key(&map.pattern, &resource.name)?;
                if let Some(group) = map.get(&key) {
                    stale |= group.update_time > resource.update_time;
                    sources.push(group.representative.clone());
                }
                visited.insert(key);
            }
            // Every dependency must have a group for this target
            if stale && sources.len() == maps.len() {
                actions.push(self.action_for(rule, &resource.name, &sources)?);
            }
        }
        Ok((actions, visited))
    }

    /// Synthesize targets for dependency groups no existing target covers
    async fn create_missing(
        &self,
        rule: &GeneratedResourceRule,
        target: &str,
        existing: &[ResourceInstance],
        maps: &[DependencyMap],
        visited: &BTreeSet<GroupKey>,
    ) -> Result<Vec<Action>, ControllerError> {
        let Some((index, kind)) = shallowest_reference(rule)? else {
            return self.create_global(rule, target, visited);
        };
        let Some(map) = maps.get(index) else {
            return Ok(Vec::new());
        };

        let existing: BTreeSet<String> = existing.iter().map(|r| r.name.to_string()).collect();
        let mut planned = BTreeSet::new();
        let mut actions = Vec::new();

        for key in map.keys() {
            if visited.contains(key) {
                continue;
            }
            let GroupKey::Entity(group) = key else {
                continue;
            };
            if list_resources(&self.registry, group, "").await?.is_empty() {
                tracing::debug!(%group, "group no longer resolves");
                continue;
            }
            let candidate = substitute(target, kind, group).ok_or_else(|| {
                PatternError::MissingEntity {
                    kind,
                    pattern: target.to_string(),
                }
            })?;

            for name in self.expand(&candidate).await? {
                let rendered = name.to_string();
                if existing.contains(&rendered) || planned.contains(&rendered) {
                    continue;
                }
                let Some(sources) = satisfied_sources(maps, &name)? else {
                    tracing::debug!(resource = %name, "dependencies not satisfied");
                    continue;
                };
                actions.push(self.action_for(rule, &name, &sources)?);
                planned.insert(rendered);
            }
        }
        Ok(actions)
    }

    /// The single target of a rule whose dependencies are all global
    fn create_global(
        &self,
        rule: &GeneratedResourceRule,
        target: &str,
        visited: &BTreeSet<GroupKey>,
    ) -> Result<Vec<Action>, ControllerError> {
        if visited.contains(&GroupKey::Global) {
            return Ok(Vec::new());
        }
        if mentions_resource(&rule.action) {
            return Err(ControllerError::Configuration(format!(
                "action {:?} refers to $resource but no dependency of {} does",
                rule.action, rule.pattern
            )));
        }
        let name = Pattern::parse(target)?.name;
        if name.has_wildcard() {
            return Err(ControllerError::Configuration(format!(
                "{} matches many resources but its dependencies are all global",
                rule.pattern
            )));
        }
        Ok(vec![
            Action::new(&rule.action, name.to_string()).with_receipt(rule.receipt)
        ])
    }

    /// Act on targets whose own update time is older than the refresh interval
    async fn refresh_targets(
        &self,
        rule: &GeneratedResourceRule,
        target: &str,
    ) -> Result<Vec<Action>, ControllerError> {
        let Some(refresh) = rule.refresh else {
            return Err(ControllerError::Configuration(format!(
                "{} has neither dependencies nor a refresh interval",
                rule.pattern
            )));
        };

        let receipts: BTreeMap<String, _> = list_resources(&self.registry, target, "")
            .await?
            .into_iter()
            .map(|r| (r.name.to_string(), r.update_time))
            .collect();
        let now = self.clock.now();

        let mut actions = Vec::new();
        for name in self.expand(target).await? {
            let due = match receipts.get(&name.to_string()) {
                None => true,
                Some(written) => now
                    .signed_duration_since(*written)
                    .to_std()
                    .is_ok_and(|age| age > refresh),
            };
            if due {
                actions.push(self.action_for(rule, &name, &[])?);
            }
        }
        Ok(actions)
    }

    /// Concrete names for a target whose parent may still hold wildcards
    ///
    /// The parent is listed and the target's leaf re-rooted under each
    /// resource found.
    async fn expand(&self, candidate: &str) -> Result<Vec<ResourceName>, ControllerError> {
        let name = Pattern::parse(candidate)?.name;
        let parent = match name.parent() {
            Some(parent) if parent.has_wildcard() => parent,
            _ => return Ok(vec![name]),
        };
        list_resources(&self.registry, &parent.to_string(), "")
            .await?
            .iter()
            .map(|p| reparent(&name, &p.name))
            .collect()
    }

    fn action_for(
        &self,
        rule: &GeneratedResourceRule,
        target: &ResourceName,
        sources: &[ResourceName],
    ) -> Result<Action, ControllerError> {
        let command = render(&rule.action, target, sources)?;
        Ok(Action::new(command, target.to_string()).with_receipt(rule.receipt))
    }
}

/// Dependency with the shallowest `$resource` reference, if any has one
fn shallowest_reference(
    rule: &GeneratedResourceRule,
) -> Result<Option<(usize, ResourceKind)>, PatternError> {
    let mut shallowest: Option<(usize, ResourceKind)> = None;
    for (index, dependency) in rule.dependencies.iter().enumerate() {
        let Some(reference) = Reference::parse(&dependency.pattern)? else {
            continue;
        };
        let shallower = match shallowest {
            None => true,
            Some((_, kind)) => reference.kind.depth() < kind.depth(),
        };
        if shallower {
            shallowest = Some((index, reference.kind));
        }
    }
    Ok(shallowest)
}

/// Representatives of every dependency group `target` falls in, or `None`
/// when some dependency has no group for it
fn satisfied_sources(
    maps: &[DependencyMap],
    target: &ResourceName,
) -> Result<Option<Vec<ResourceName>>, PatternError> {
    let mut sources = Vec::with_capacity(maps.len());
    for map in maps {
        match map.get(&group_key(&map.pattern, target)?) {
            Some(group) => sources.push(group.representative.clone()),
            None => return Ok(None),
        }
    }
    Ok(Some(sources))
}

/// `name` with its parent replaced by `parent`
fn reparent(name: &ResourceName, parent: &ResourceName) -> Result<ResourceName, ControllerError> {
    let rendered = name.to_string();
    let old_parent = name.parent().map(|p| p.as_parent()).unwrap_or_default();
    let leaf = rendered
        .strip_prefix(&old_parent)
        .ok_or_else(|| PatternError::Unrecognized(rendered.clone()))?;
    Ok(ResourceName::parse(&format!("{}{leaf}", parent.as_parent()))?)
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
