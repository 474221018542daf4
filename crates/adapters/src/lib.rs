// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the registry service, action subprocesses,
//! and linter plugins

pub mod command;
pub mod linter;
pub mod registry;
pub mod traced;

pub use command::{CommandError, CommandOutput, CommandRunner, ProcessCommandRunner};
pub use linter::{LinterError, LinterPlugin, LinterRequest, LinterResponse};
pub use registry::{
    upsert_artifact, HttpRegistryAdapter, ListPage, ListRequest, RegistryAdapter, RegistryConfig,
    RegistryError, DEFAULT_PAGE_SIZE, RECEIPT_MIME_TYPE,
};
pub use traced::{TracedCommandRunner, TracedRegistryAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use command::{CommandCall, FakeCommandRunner};
#[cfg(any(test, feature = "test-support"))]
pub use registry::{FakeRegistryAdapter, FakeResource, RegistryCall};
