// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry resource names
//!
//! Names are hierarchical paths such as
//! `projects/p/locations/global/apis/a/versions/v/specs/s/artifacts/x`.
//! Any id segment of a name may be the wildcard `-`, which turns the name
//! into a pattern matching every resource at that position.

mod grammar;
mod ident;

pub use ident::{validate_id, validate_revision, MAX_ID_LEN};

use crate::error::PatternError;
use std::fmt;
use std::str::FromStr;

/// Id segment matching every resource at its position
pub const WILDCARD: &str = "-";

/// The only location the registry serves
pub const LOCATION: &str = "global";

/// Kinds of registry resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Project,
    Api,
    Version,
    Spec,
    SpecRevision,
    Deployment,
    DeploymentRevision,
    Artifact,
}

impl ResourceKind {
    /// Plural path segment that precedes ids of this kind
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Api => "apis",
            ResourceKind::Version => "versions",
            ResourceKind::Spec | ResourceKind::SpecRevision => "specs",
            ResourceKind::Deployment | ResourceKind::DeploymentRevision => "deployments",
            ResourceKind::Artifact => "artifacts",
        }
    }

    /// Kind named by a `$resource.<kind>` reference
    pub fn from_reference(s: &str) -> Option<Self> {
        match s {
            "api" => Some(ResourceKind::Api),
            "version" => Some(ResourceKind::Version),
            "spec" => Some(ResourceKind::Spec),
            "deployment" => Some(ResourceKind::Deployment),
            "artifact" => Some(ResourceKind::Artifact),
            _ => None,
        }
    }

    /// Hierarchy depth below the project
    pub fn depth(self) -> usize {
        match self {
            ResourceKind::Project => 0,
            ResourceKind::Api => 1,
            ResourceKind::Version => 2,
            ResourceKind::Spec
            | ResourceKind::SpecRevision
            | ResourceKind::Deployment
            | ResourceKind::DeploymentRevision => 3,
            ResourceKind::Artifact => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Api => "api",
            ResourceKind::Version => "version",
            ResourceKind::Spec => "spec",
            ResourceKind::SpecRevision => "spec revision",
            ResourceKind::Deployment => "deployment",
            ResourceKind::DeploymentRevision => "deployment revision",
            ResourceKind::Artifact => "artifact",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revision selector on a spec or deployment name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Revision {
    Id(String),
    /// `@` or `@-`
    All,
}

impl Revision {
    pub fn parse(tag: &str) -> Self {
        if tag.is_empty() || tag == WILDCARD {
            Revision::All
        } else {
            Revision::Id(tag.to_string())
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Id(id) => f.write_str(id),
            Revision::All => f.write_str(WILDCARD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName {
    id: String,
}

impl ProjectName {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `projects/<id>/locations/global`, the root that relative patterns hang off
    pub fn location(&self) -> String {
        format!("{self}/locations/{LOCATION}")
    }

    /// Anchor a project-relative pattern; absolute patterns pass through
    pub fn qualify(&self, pattern: &str) -> String {
        if pattern.starts_with("projects/") {
            pattern.to_string()
        } else {
            format!("{}/{}", self.location(), pattern.trim_start_matches('/'))
        }
    }

    pub fn api(&self, id: impl Into<String>) -> ApiName {
        ApiName {
            project: self.clone(),
            id: id.into(),
        }
    }

    pub fn artifact(&self, id: impl Into<String>) -> ArtifactName {
        ArtifactName::new(ResourceName::Project(self.clone()), id)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiName {
    project: ProjectName,
    id: String,
}

impl ApiName {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    pub fn version(&self, id: impl Into<String>) -> VersionName {
        VersionName {
            api: self.clone(),
            id: id.into(),
        }
    }

    pub fn deployment(&self, id: impl Into<String>) -> DeploymentName {
        DeploymentName {
            api: self.clone(),
            id: id.into(),
            revision: None,
        }
    }

    pub fn artifact(&self, id: impl Into<String>) -> ArtifactName {
        ArtifactName::new(ResourceName::Api(self.clone()), id)
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/apis/{}", self.project.location(), self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionName {
    api: ApiName,
    id: String,
}

impl VersionName {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn api(&self) -> &ApiName {
        &self.api
    }

    pub fn spec(&self, id: impl Into<String>) -> SpecName {
        SpecName {
            version: self.clone(),
            id: id.into(),
            revision: None,
        }
    }

    pub fn artifact(&self, id: impl Into<String>) -> ArtifactName {
        ArtifactName::new(ResourceName::Version(self.clone()), id)
    }
}

impl fmt::Display for VersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/versions/{}", self.api, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecName {
    version: VersionName,
    id: String,
    revision: Option<Revision>,
}

impl SpecName {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &VersionName {
        &self.version
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn with_revision(&self, revision: Revision) -> Self {
        Self {
            revision: Some(revision),
            ..self.clone()
        }
    }

    pub fn without_revision(&self) -> Self {
        Self {
            revision: None,
            ..self.clone()
        }
    }

    pub fn artifact(&self, id: impl Into<String>) -> ArtifactName {
        ArtifactName::new(ResourceName::Spec(self.clone()), id)
    }
}

impl fmt::Display for SpecName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/specs/{}", self.version, self.id)?;
        if let Some(revision) = &self.revision {
            write!(f, "@{revision}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentName {
    api: ApiName,
    id: String,
    revision: Option<Revision>,
}

impl DeploymentName {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn api(&self) -> &ApiName {
        &self.api
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn with_revision(&self, revision: Revision) -> Self {
        Self {
            revision: Some(revision),
            ..self.clone()
        }
    }

    pub fn without_revision(&self) -> Self {
        Self {
            revision: None,
            ..self.clone()
        }
    }

    pub fn artifact(&self, id: impl Into<String>) -> ArtifactName {
        ArtifactName::new(ResourceName::Deployment(self.clone()), id)
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/deployments/{}", self.api, self.id)?;
        if let Some(revision) = &self.revision {
            write!(f, "@{revision}")?;
        }
        Ok(())
    }
}

/// An artifact attached to any non-artifact resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    parent: Box<ResourceName>,
    id: String,
}

impl ArtifactName {
    fn new(parent: ResourceName, id: impl Into<String>) -> Self {
        Self {
            parent: Box::new(parent),
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> &ResourceName {
        &self.parent
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/artifacts/{}", self.parent.as_parent(), self.id)
    }
}

/// Any registry resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceName {
    Project(ProjectName),
    Api(ApiName),
    Version(VersionName),
    Spec(SpecName),
    Deployment(DeploymentName),
    Artifact(ArtifactName),
}

impl ResourceName {
    /// Parse an entity name; wildcard ids are accepted
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        grammar::parse_entity(s).ok_or_else(|| PatternError::Unrecognized(s.to_string()))
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceName::Project(_) => ResourceKind::Project,
            ResourceName::Api(_) => ResourceKind::Api,
            ResourceName::Version(_) => ResourceKind::Version,
            ResourceName::Spec(s) if s.revision.is_some() => ResourceKind::SpecRevision,
            ResourceName::Spec(_) => ResourceKind::Spec,
            ResourceName::Deployment(d) if d.revision.is_some() => {
                ResourceKind::DeploymentRevision
            }
            ResourceName::Deployment(_) => ResourceKind::Deployment,
            ResourceName::Artifact(_) => ResourceKind::Artifact,
        }
    }

    /// Leaf id, without any revision tag
    pub fn id(&self) -> &str {
        match self {
            ResourceName::Project(p) => p.id(),
            ResourceName::Api(a) => a.id(),
            ResourceName::Version(v) => v.id(),
            ResourceName::Spec(s) => s.id(),
            ResourceName::Deployment(d) => d.id(),
            ResourceName::Artifact(a) => a.id(),
        }
    }

    pub fn project(&self) -> &ProjectName {
        match self {
            ResourceName::Project(p) => p,
            ResourceName::Api(a) => a.project(),
            ResourceName::Version(v) => v.api().project(),
            ResourceName::Spec(s) => s.version().api().project(),
            ResourceName::Deployment(d) => d.api().project(),
            ResourceName::Artifact(a) => a.parent().project(),
        }
    }

    /// Path child collections hang off; projects resolve to their location
    pub fn as_parent(&self) -> String {
        match self {
            ResourceName::Project(p) => p.location(),
            other => other.to_string(),
        }
    }

    pub fn parent(&self) -> Option<ResourceName> {
        match self {
            ResourceName::Project(_) => None,
            ResourceName::Api(a) => Some(ResourceName::Project(a.project().clone())),
            ResourceName::Version(v) => Some(ResourceName::Api(v.api().clone())),
            ResourceName::Spec(s) => Some(ResourceName::Version(s.version().clone())),
            ResourceName::Deployment(d) => Some(ResourceName::Api(d.api().clone())),
            ResourceName::Artifact(a) => Some(a.parent().clone()),
        }
    }

    /// The name itself or the ancestor of the given kind, if it has one
    ///
    /// Revision kinds resolve like their base kind; a revision tag on the
    /// ancestor is kept.
    pub fn ancestor(&self, kind: ResourceKind) -> Option<ResourceName> {
        match (kind, self) {
            (ResourceKind::Project, name) => Some(ResourceName::Project(name.project().clone())),
            (ResourceKind::Api, ResourceName::Api(_)) => Some(self.clone()),
            (ResourceKind::Api, ResourceName::Version(v)) => {
                Some(ResourceName::Api(v.api().clone()))
            }
            (ResourceKind::Api, ResourceName::Spec(s)) => {
                Some(ResourceName::Api(s.version().api().clone()))
            }
            (ResourceKind::Api, ResourceName::Deployment(d)) => {
                Some(ResourceName::Api(d.api().clone()))
            }
            (ResourceKind::Version, ResourceName::Version(_)) => Some(self.clone()),
            (ResourceKind::Version, ResourceName::Spec(s)) => {
                Some(ResourceName::Version(s.version().clone()))
            }
            (ResourceKind::Spec | ResourceKind::SpecRevision, ResourceName::Spec(_)) => {
                Some(self.clone())
            }
            (
                ResourceKind::Deployment | ResourceKind::DeploymentRevision,
                ResourceName::Deployment(_),
            ) => Some(self.clone()),
            (ResourceKind::Artifact, ResourceName::Artifact(_)) => Some(self.clone()),
            (_, ResourceName::Artifact(a)) => a.parent().ancestor(kind),
            _ => None,
        }
    }

    /// Attach an artifact; artifacts cannot own artifacts
    pub fn artifact(&self, id: impl Into<String>) -> Option<ArtifactName> {
        match self {
            ResourceName::Artifact(_) => None,
            parent => Some(ArtifactName::new(parent.clone(), id)),
        }
    }

    /// Whether any id segment or revision selector matches more than one resource
    pub fn has_wildcard(&self) -> bool {
        let revision_wild = |r: Option<&Revision>| matches!(r, Some(Revision::All));
        let own = self.id() == WILDCARD
            || match self {
                ResourceName::Spec(s) => revision_wild(s.revision()),
                ResourceName::Deployment(d) => revision_wild(d.revision()),
                _ => false,
            };
        own || self.parent().is_some_and(|p| p.has_wildcard())
    }

    /// Check identifier rules on every segment
    ///
    /// Applied when a resource is created; parsing alone stays lenient so
    /// that patterns and names returned by the registry always round-trip.
    pub fn validate(&self) -> Result<(), PatternError> {
        if let Some(parent) = self.parent() {
            parent.validate()?;
        }
        validate_id(self.id())?;
        let revision = match self {
            ResourceName::Spec(s) => s.revision(),
            ResourceName::Deployment(d) => d.revision(),
            _ => None,
        };
        match revision {
            Some(Revision::Id(tag)) => validate_revision(tag),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceName::Project(p) => p.fmt(f),
            ResourceName::Api(a) => a.fmt(f),
            ResourceName::Version(v) => v.fmt(f),
            ResourceName::Spec(s) => s.fmt(f),
            ResourceName::Deployment(d) => d.fmt(f),
            ResourceName::Artifact(a) => a.fmt(f),
        }
    }
}

impl FromStr for ResourceName {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! impl_from_name {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for ResourceName {
            fn from(name: $ty) -> Self {
                ResourceName::$variant(name)
            }
        })*
    };
}

impl_from_name! {
    ProjectName => Project,
    ApiName => Api,
    VersionName => Version,
    SpecName => Spec,
    DeploymentName => Deployment,
    ArtifactName => Artifact,
}

/// Whether a pattern names a collection (`.../specs`) or an entity (`.../specs/x`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Collection,
    Entity,
}

/// A parsed pattern
///
/// Collections are normalized to a wildcard leaf, so `apis/a/versions` and
/// `apis/a/versions/-` both carry the name `apis/a/versions/-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub name: ResourceName,
    pub shape: Shape,
}

impl Pattern {
    /// Parse a pattern, trying collection grammars before entity grammars
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        if let Some(name) = grammar::parse_collection(s) {
            return Ok(Self {
                name,
                shape: Shape::Collection,
            });
        }
        let name = ResourceName::parse(s)?;
        Ok(Self {
            name,
            shape: Shape::Entity,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.name.kind()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
