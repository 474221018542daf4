// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry service adapters

mod http;

pub use http::{HttpRegistryAdapter, RegistryConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRegistryAdapter, FakeResource, RegistryCall};

use async_trait::async_trait;
use reg_core::{ArtifactName, PatternError, ResourceInstance, ResourceKind, ResourceName};
use thiserror::Error;

/// Largest page requested from the registry
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Mime type written on receipt artifacts
pub const RECEIPT_MIME_TYPE: &str = "application/octet-stream";

/// Errors from registry operations
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("registry returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Name(#[from] PatternError),
}

/// One List call: resources of `kind` directly under `parent`
///
/// `parent` may contain wildcards. Revision listings take the spec or
/// deployment name itself as parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub kind: ResourceKind,
    pub parent: String,
    pub filter: String,
    pub page_size: u32,
    pub page_token: String,
}

impl ListRequest {
    pub fn new(kind: ResourceKind, parent: impl Into<String>) -> Self {
        Self {
            kind,
            parent: parent.into(),
            filter: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_token: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = page_token.into();
        self
    }
}

/// One page of a List response; an empty token marks the last page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub resources: Vec<ResourceInstance>,
    pub next_page_token: String,
}

/// Adapter for the registry service
#[async_trait]
pub trait RegistryAdapter: Clone + Send + Sync + 'static {
    /// Fetch one page of a listing
    async fn list(&self, request: &ListRequest) -> Result<ListPage, RegistryError>;

    /// Create an artifact; fails with `AlreadyExists` if it is present
    async fn create_artifact(&self, name: &ArtifactName, mime_type: &str)
        -> Result<(), RegistryError>;

    /// Replace an existing artifact; fails with `NotFound` if it is absent
    async fn replace_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError>;
}

/// Create an artifact, replacing it if it already exists
///
/// Any failure other than `AlreadyExists` on create is returned as is.
pub async fn upsert_artifact<R: RegistryAdapter>(
    registry: &R,
    name: &ArtifactName,
    mime_type: &str,
) -> Result<(), RegistryError> {
    ResourceName::Artifact(name.clone()).validate()?;
    match registry.create_artifact(name, mime_type).await {
        Err(RegistryError::AlreadyExists(_)) => {
            tracing::debug!(artifact = %name, "exists, replacing");
            registry.replace_artifact(name, mime_type).await
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "upsert_tests.rs"]
mod tests;
