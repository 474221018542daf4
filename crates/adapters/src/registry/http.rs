// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry adapter over the HTTP/JSON gateway

use super::{ListPage, ListRequest, RegistryAdapter, RegistryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reg_core::{ArtifactName, ResourceInstance, ResourceKind, ResourceName};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL, such as `http://localhost:8080`
    pub address: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:8080".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Registry client speaking the `/v1` JSON gateway
///
/// Calls are blocking HTTP requests moved onto tokio's blocking pool.
#[derive(Clone)]
pub struct HttpRegistryAdapter {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpRegistryAdapter {
    pub fn new(config: &RegistryConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base_url: config.address.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// URL of the List endpoint for a request
    pub fn list_url(&self, request: &ListRequest) -> String {
        let base = &self.base_url;
        let parent = &request.parent;
        match request.kind {
            ResourceKind::Project => format!("{base}/v1/projects"),
            ResourceKind::SpecRevision | ResourceKind::DeploymentRevision => {
                format!("{base}/v1/{parent}:listRevisions")
            }
            kind => format!("{base}/v1/{parent}/{}", kind.collection()),
        }
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn list_blocking(&self, url: &str, request: &ListRequest) -> Result<ListPage, RegistryError> {
        let mut call = self
            .agent
            .get(url)
            .query("pageSize", request.page_size.to_string());
        if !request.filter.is_empty() {
            call = call.query("filter", &request.filter);
        }
        if !request.page_token.is_empty() {
            call = call.query("pageToken", &request.page_token);
        }
        let mut response = self
            .authorize(call)
            .call()
            .map_err(|e| map_error(e, url, &request.parent))?;
        let body: WireList = response
            .body_mut()
            .read_json()
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        let resources = body
            .resources
            .into_iter()
            .map(|r| r.into_instance(request.kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListPage {
            resources,
            next_page_token: body.next_page_token,
        })
    }

    fn write_blocking(
        &self,
        name: &ArtifactName,
        mime_type: &str,
        replace: bool,
    ) -> Result<(), RegistryError> {
        let body = serde_json::json!({ "mimeType": mime_type });
        let target = name.to_string();
        let result = if replace {
            let url = format!("{}/v1/{target}", self.base_url);
            self.authorize(self.agent.put(&url))
                .send_json(&body)
                .map_err(|e| map_error(e, &url, &target))
        } else {
            let parent = name.parent().as_parent();
            let url = format!("{}/v1/{parent}/artifacts", self.base_url);
            self.authorize(self.agent.post(&url))
                .query("artifactId", name.id())
                .send_json(&body)
                .map_err(|e| map_error(e, &url, &target))
        };
        result.map(|_| ())
    }
}

fn map_error(error: ureq::Error, url: &str, subject: &str) -> RegistryError {
    match error {
        ureq::Error::StatusCode(409) => RegistryError::AlreadyExists(subject.to_string()),
        ureq::Error::StatusCode(404) => RegistryError::NotFound(subject.to_string()),
        ureq::Error::StatusCode(status) => RegistryError::Status {
            status,
            url: url.to_string(),
        },
        other => RegistryError::Transport(other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireList {
    #[serde(
        default,
        alias = "projects",
        alias = "apis",
        alias = "apiVersions",
        alias = "apiSpecs",
        alias = "apiDeployments",
        alias = "artifacts"
    )]
    resources: Vec<WireResource>,
    #[serde(default)]
    next_page_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResource {
    name: String,
    #[serde(default)]
    update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    revision_update_time: Option<DateTime<Utc>>,
}

impl WireResource {
    fn into_instance(self, kind: ResourceKind) -> Result<ResourceInstance, RegistryError> {
        // Specs and deployments go stale when a new revision lands
        let time = match kind {
            ResourceKind::Spec
            | ResourceKind::SpecRevision
            | ResourceKind::Deployment
            | ResourceKind::DeploymentRevision => self.revision_update_time.or(self.update_time),
            _ => self.update_time,
        };
        let time = time.ok_or_else(|| {
            RegistryError::InvalidResponse(format!("{} has no update time", self.name))
        })?;
        Ok(ResourceInstance::new(ResourceName::parse(&self.name)?, time))
    }
}

#[async_trait]
impl RegistryAdapter for HttpRegistryAdapter {
    async fn list(&self, request: &ListRequest) -> Result<ListPage, RegistryError> {
        let url = self.list_url(request);
        let this = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || this.list_blocking(&url, &request))
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?
    }

    async fn create_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let this = self.clone();
        let name = name.clone();
        let mime_type = mime_type.to_string();
        tokio::task::spawn_blocking(move || this.write_blocking(&name, &mime_type, false))
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?
    }

    async fn replace_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let this = self.clone();
        let name = name.clone();
        let mime_type = mime_type.to_string();
        tokio::task::spawn_blocking(move || this.write_blocking(&name, &mime_type, true))
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
