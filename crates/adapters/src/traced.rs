// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::command::{CommandError, CommandOutput, CommandRunner};
use crate::registry::{ListPage, ListRequest, RegistryAdapter, RegistryError};
use async_trait::async_trait;
use reg_core::ArtifactName;
use tracing::Instrument;

/// Wrapper that adds tracing to any RegistryAdapter
#[derive(Clone)]
pub struct TracedRegistryAdapter<R> {
    inner: R,
}

impl<R> TracedRegistryAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RegistryAdapter> RegistryAdapter for TracedRegistryAdapter<R> {
    async fn list(&self, request: &ListRequest) -> Result<ListPage, RegistryError> {
        let span = tracing::debug_span!(
            "registry.list",
            kind = %request.kind,
            parent = %request.parent,
            filter = %request.filter,
        );
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(page) => tracing::debug!(
                    count = page.resources.len(),
                    more = !page.next_page_token.is_empty(),
                    elapsed_ms,
                    "listed"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "list failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn create_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let span = tracing::info_span!("registry.create_artifact", artifact = %name);
        async {
            let result = self.inner.create_artifact(name, mime_type).await;
            match &result {
                Ok(()) => tracing::info!("artifact created"),
                // AlreadyExists is the expected path for an upsert
                Err(RegistryError::AlreadyExists(_)) => tracing::debug!("artifact exists"),
                Err(e) => tracing::error!(error = %e, "create failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn replace_artifact(
        &self,
        name: &ArtifactName,
        mime_type: &str,
    ) -> Result<(), RegistryError> {
        let span = tracing::info_span!("registry.replace_artifact", artifact = %name);
        async {
            let result = self.inner.replace_artifact(name, mime_type).await;
            match &result {
                Ok(()) => tracing::info!("artifact replaced"),
                Err(e) => tracing::error!(error = %e, "replace failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any CommandRunner
#[derive(Clone)]
pub struct TracedCommandRunner<C> {
    inner: C,
}

impl<C> TracedCommandRunner<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: CommandRunner> CommandRunner for TracedCommandRunner<C> {
    async fn run(
        &self,
        command: &str,
        env: &[(String, String)],
    ) -> Result<CommandOutput, CommandError> {
        let span = tracing::info_span!("command.run", command);
        async {
            tracing::info!(env_count = env.len(), "starting");

            let start = std::time::Instant::now();
            let result = self.inner.run(command, env).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(output) => {
                    if !output.stdout.is_empty() {
                        tracing::info!(stdout = %output.stdout.trim_end(), "command stdout");
                    }
                    if !output.stderr.is_empty() {
                        tracing::warn!(stderr = %output.stderr.trim_end(), "command stderr");
                    }
                    tracing::info!(exit_code = output.exit_code, elapsed_ms, "finished");
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "run failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
