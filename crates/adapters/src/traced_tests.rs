// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::command::FakeCommandRunner;
use crate::registry::FakeRegistryAdapter;
use reg_core::{ProjectName, ResourceKind};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[test]
fn traced_list_logs_span_and_count() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedRegistryAdapter::new(FakeRegistryAdapter::new());
        traced
            .list(&ListRequest::new(
                ResourceKind::Api,
                "projects/p/locations/global",
            ))
            .await
    });

    assert!(result.is_ok(), "list should succeed: {:?}", result);
    assert!(logs.contains("registry.list"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("listed"), "Should log completion. Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{}", logs);
}

#[test]
fn traced_list_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedRegistryAdapter::new(FakeRegistryAdapter::new());
        traced
            .list(
                &ListRequest::new(ResourceKind::Api, "projects/p/locations/global")
                    .with_filter("nonsense"),
            )
            .await
    });

    assert!(result.is_err());
    assert!(logs.contains("list failed"), "Should log failure. Logs:\n{}", logs);
}

#[test]
fn traced_create_treats_conflict_as_expected() {
    let (logs, _) = with_tracing(|| async {
        let traced = TracedRegistryAdapter::new(FakeRegistryAdapter::new());
        let name = ProjectName::new("p").artifact("receipt");
        traced.create_artifact(&name, "").await.unwrap();
        traced.create_artifact(&name, "").await
    });

    assert!(logs.contains("artifact created"), "Logs:\n{}", logs);
    assert!(logs.contains("artifact exists"), "Logs:\n{}", logs);
    assert!(!logs.contains("create failed"), "Logs:\n{}", logs);
}

#[test]
fn traced_command_logs_exit_code() {
    let (logs, result) = with_tracing(|| async {
        let runner = FakeCommandRunner::new();
        runner.fail_with("compute", 2);
        TracedCommandRunner::new(runner)
            .run("compute lint x", &[])
            .await
    });

    assert_eq!(result.unwrap().exit_code, 2);
    assert!(logs.contains("command.run"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("compute lint x"), "Should log command. Logs:\n{}", logs);
    assert!(logs.contains("exit_code=2"), "Should log exit code. Logs:\n{}", logs);
}
