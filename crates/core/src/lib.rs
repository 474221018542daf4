// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reg-core: resource names and patterns for the registry controller
//!
//! This crate provides:
//! - Parsing, validation and navigation of hierarchical resource names
//! - `$resource` pattern extension and dependency grouping
//! - Command template rendering
//! - A clock abstraction for receipt freshness checks

pub mod action;
pub mod clock;
pub mod error;
pub mod name;
pub mod pattern;
pub mod resource;
pub mod template;

pub use action::Action;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::PatternError;
pub use name::{
    ApiName, ArtifactName, DeploymentName, Pattern, ProjectName, ResourceKind, ResourceName,
    Revision, Shape, SpecName, VersionName, WILDCARD,
};
pub use pattern::{extend, group_key, GroupKey, Reference};
pub use resource::ResourceInstance;
pub use template::render;
