// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Registry controller engine
//!
//! Plans actions for a manifest against live registry state and runs them
//! on a bounded worker pool.

mod controller;
mod dependency;
mod error;
mod executor;
mod lister;

pub use controller::Controller;
pub use dependency::{build_dependency_map, DependencyGroup, DependencyMap};
pub use error::{ControllerError, TaskError};
pub use executor::{
    check_recursion, execute_actions, CommandTask, Task, TaskPool, TaskReport, DEFAULT_JOBS,
    RESOLVE_DEPTH_ENV,
};
pub use lister::list_resources;
