// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Controller manifest parsing and validation

mod parser;
mod types;
mod validate;

pub use parser::{load_manifest, parse_manifest, ParseError};
pub use types::{Dependency, GeneratedResourceRule, Manifest};
pub use validate::{validate_manifest, validate_rule, ValidationError};
