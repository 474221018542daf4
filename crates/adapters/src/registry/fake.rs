// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake registry adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ListPage, ListRequest, RegistryAdapter, RegistryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reg_core::{
    ArtifactName, Clock, FakeClock, PatternError, ResourceInstance, ResourceKind, ResourceName,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Recorded registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    List {
        kind: ResourceKind,
        parent: String,
        filter: String,
        page_token: String,
    },
    CreateArtifact {
        name: String,
    },
    ReplaceArtifact {
        name: String,
    },
}

/// Stored resource
#[derive(Debug, Clone)]
pub struct FakeResource {
    pub name: ResourceName,
    pub update_time: DateTime<Utc>,
    pub mime_type: String,
}

struct FakeState {
    resources: BTreeMap<String, FakeResource>,
    calls: Vec<RegistryCall>,
    page_size: usize,
    write_error: Option<RegistryError>,
}

/// In-memory registry for testing
///
/// Supports wildcard parents and the filter forms `field == 'v'` and
/// `field.contains('v')` combined with `&&`, `||` and parentheses. Artifact
/// writes are stamped with the fake's clock.
#[derive(Clone)]
pub struct FakeRegistryAdapter {
    state: Arc<Mutex<FakeState>>,
    clock: FakeClock,
}

impl Default for FakeRegistryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRegistryAdapter {
    pub fn new() -> Self {
        Self::with_clock(FakeClock::new())
    }

    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                resources: BTreeMap::new(),
                calls: Vec::new(),
                page_size: usize::MAX,
                write_error: None,
            })),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cap every page at `page_size` resources to exercise pagination
    pub fn set_page_size(&self, page_size: usize) {
        self.lock().page_size = page_size.max(1);
    }

    /// Store a resource, replacing any previous one with the same name
    pub fn add(&self, name: &str, update_time: DateTime<Utc>) -> Result<(), PatternError> {
        self.add_with_mime(name, update_time, "")
    }

    pub fn add_with_mime(
        &self,
        name: &str,
        update_time: DateTime<Utc>,
        mime_type: &str,
    ) -> Result<(), PatternError> {
        let name = ResourceName::parse(name)?;
        self.lock().resources.insert(
            name.to_string(),
            FakeResource {
                name,
                update_time,
                mime_type: mime_type.to_string(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<FakeResource> {
        self.lock().resources.get(name).cloned()
    }

    /// Fail every subsequent artifact write with `error`
    pub fn fail_writes(&self, error: RegistryError) {
        self.lock().write_error = Some(error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.lock().calls.clone()
    }
}

/// Name of the resource a record is listed under
fn listing_parent(name: &ResourceName) -> String {
    match name {
        ResourceName::Spec(s) if s.revision().is_some() => s.without_revision().to_string(),
        ResourceName::Deployment(d) if d.revision().is_some() => d.without_revision().to_string(),
        other => other.parent().map(|p| p.as_parent()).unwrap_or_default(),
    }
}

fn segment_matches(pattern: &str, segment: &str) -> bool {
    if pattern == "-" {
        return true;
    }
    let (pattern_id, pattern_rev) = split_revision(pattern);
    let (id, rev) = split_revision(segment);
    let id_ok = pattern_id == "-" || pattern_id == id;
    let rev_ok = match (pattern_rev, rev) {
        (None, None) => true,
        (Some(p), Some(r)) => p.is_empty() || p == "-" || p == r,
        _ => false,
    };
    id_ok && rev_ok
}

fn split_revision(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once('@') {
        Some((id, rev)) => (id, Some(rev)),
        None => (segment, None),
    }
}

fn parent_matches(pattern: &str, parent: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let parent: Vec<&str> = parent.split('/').collect();
    pattern.len() == parent.len()
        && pattern
            .iter()
            .zip(&parent)
            .all(|(p, s)| segment_matches(p, s))
}

fn field(resource: &FakeResource, name: &str) -> Option<String> {
    let r = &resource.name;
    let id_of = |kind: ResourceKind| r.ancestor(kind).map(|a| a.id().to_string());
    match name {
        "name" => Some(r.to_string()),
        "mime_type" => Some(resource.mime_type.clone()),
        "project_id" => Some(r.project().id().to_string()),
        "api_id" => id_of(ResourceKind::Api),
        "version_id" => id_of(ResourceKind::Version),
        "spec_id" => id_of(ResourceKind::Spec),
        "deployment_id" => id_of(ResourceKind::Deployment),
        "artifact_id" => id_of(ResourceKind::Artifact),
        "revision_id" => match r {
            ResourceName::Spec(s) => s.revision().map(|v| v.to_string()),
            ResourceName::Deployment(d) => d.revision().map(|v| v.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Fields the fake's filter evaluator understands
const FIELDS: &[&str] = &[
    "name",
    "mime_type",
    "project_id",
    "api_id",
    "version_id",
    "spec_id",
    "deployment_id",
    "artifact_id",
    "revision_id",
];

/// Parsed filter expression
#[derive(Debug, PartialEq, Eq)]
enum Filter {
    All(Vec<Filter>),
    Any(Vec<Filter>),
    Equals { field: String, value: String },
    Contains { field: String, needle: String },
}

impl Filter {
    /// Parse a filter; `None` when the expression is not understood
    fn parse(filter: &str) -> Option<Self> {
        if filter.trim().is_empty() {
            return Some(Filter::All(Vec::new()));
        }
        Self::parse_expr(filter)
    }

    fn parse_expr(expr: &str) -> Option<Self> {
        let expr = strip_parens(expr.trim());
        if expr.is_empty() {
            return None;
        }
        let alternatives = split_top_level(expr, "||");
        if alternatives.len() > 1 {
            let parts = alternatives.into_iter().map(Self::parse_expr);
            return parts.collect::<Option<Vec<_>>>().map(Filter::Any);
        }
        let clauses = split_top_level(expr, "&&");
        if clauses.len() > 1 {
            let parts = clauses.into_iter().map(Self::parse_expr);
            return parts.collect::<Option<Vec<_>>>().map(Filter::All);
        }
        Self::parse_clause(expr)
    }

    fn parse_clause(clause: &str) -> Option<Self> {
        let known = |field: &str| FIELDS.contains(&field).then(|| field.to_string());
        if let Some((lhs, rhs)) = clause.split_once("==") {
            Some(Filter::Equals {
                field: known(lhs.trim())?,
                value: unquote(rhs.trim())?.to_string(),
            })
        } else if let Some((lhs, rhs)) = clause.split_once(".contains(") {
            Some(Filter::Contains {
                field: known(lhs.trim())?,
                needle: unquote(rhs.trim().strip_suffix(')')?.trim())?.to_string(),
            })
        } else {
            None
        }
    }

    fn matches(&self, resource: &FakeResource) -> bool {
        match self {
            Filter::All(parts) => parts.iter().all(|p| p.matches(resource)),
            Filter::Any(parts) => parts.iter().any(|p| p.matches(resource)),
            Filter::Equals { field: f, value } => field(resource, f).is_some_and(|v| v == *value),
            Filter::Contains { field: f, needle } => {
                field(resource, f).is_some_and(|v| v.contains(needle.as_str()))
            }
        }
    }
}

/// Split on `op` outside quotes and parentheses
fn split_top_level<'a>(expr: &'a str, op: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth -= 1,
            (None, _) if depth == 0 && i >= start && expr[i..].starts_with(op) => {
                parts.push(&expr[start..i]);
                start = i + op.len();
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

/// Remove parentheses wrapping the whole expression
fn strip_parens(mut expr: &str) -> &str {
    while expr.starts_with('(') && closing_paren(expr) == Some(expr.len() - 1) {
        expr = expr[1..expr.len() - 1].trim();
    }
    expr
}

/// Index of the parenthesis closing the one at the start of `expr`
fn closing_paren(expr: &str) -> Option<usize> {
    let mut depth = 0;
    let mut quote = None;
    for (i, c) in expr.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
}

#[async_trait]
impl RegistryAdapter for FakeRegistryAdapter {
    async fn list(&self, request: &ListRequest) -> Result<ListPage, RegistryError> {
        let mut state = self.lock();
        state.calls.push(RegistryCall::List {
            kind: request.kind,
            parent: request.parent.clone(),
            filter: request.filter.clone(),
            page_token: request.page_token.clone(),
        });

        let Some(filter) = Filter::parse(&request.filter) else {
            return Err(RegistryError::Status {
                status: 400,
                url: format!("fake://{}?filter={}", request.parent, request.filter),
            });
        };

        let matches: Vec<ResourceInstance> = state
            .resources
            .values()
            .filter(|r| r.name.kind() == request.kind)
            .filter(|r| parent_matches(&request.parent, &listing_parent(&r.name)))
            .filter(|r| filter.matches(r))
            .map(|r| ResourceInstance::new(r.name.clone(), r.update_time))
            .collect();

        let offset: usize = request.page_token.parse().unwrap_or(0);
        let page_size = state.page_size.min(request.page_size.max(1) as usize);
        let end = offset.saturating_add(page_size).min(matches.len());
        let next_page_token = if end < matches.len() {
            end.to_string()
        } else {
            String::new()
        };
        Ok(ListPage {
            resources: matches.get(offset..end).map(<[_]>::to_vec).unwrap_or_default(),
            next_page_token,
        })
    }

    async fn create_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let mut state = self.lock();
        let key = name.to_string();
        state.calls.push(RegistryCall::CreateArtifact { name: key.clone() });
        if let Some(error) = &state.write_error {
            return Err(error.clone());
        }
        if state.resources.contains_key(&key) {
            return Err(RegistryError::AlreadyExists(key));
        }
        state.resources.insert(
            key,
            FakeResource {
                name: ResourceName::Artifact(name.clone()),
                update_time: self.clock.now(),
                mime_type: mime_type.to_string(),
            },
        );
        Ok(())
    }

    async fn replace_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let mut state = self.lock();
        let key = name.to_string();
        state.calls.push(RegistryCall::ReplaceArtifact { name: key.clone() });
        if let Some(error) = &state.write_error {
            return Err(error.clone());
        }
        let now = self.clock.now();
        match state.resources.get_mut(&key) {
            Some(resource) => {
                resource.update_time = now;
                resource.mime_type = mime_type.to_string();
                Ok(())
            }
            None => Err(RegistryError::NotFound(key)),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
