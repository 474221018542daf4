// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by name parsing, pattern extension, and templating

use crate::name::ResourceKind;
use thiserror::Error;

/// A malformed name, pattern, or reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unrecognized resource pattern: {0}")]
    Unrecognized(String),

    #[error("invalid identifier {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("invalid revision tag {0:?}")]
    InvalidRevision(String),

    #[error("unknown entity kind {0:?} in reference")]
    UnknownEntity(String),

    #[error("{pattern} has no {kind} segment to extend from")]
    MissingEntity { kind: ResourceKind, pattern: String },

    #[error("{name} has no {kind} ancestor")]
    EmptyAncestor { kind: ResourceKind, name: String },

    #[error("no source resource at index {0}")]
    MissingSource(usize),

    #[error("unresolved reference left in {0:?}")]
    Unresolved(String),
}
