// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier rules for resource ids and revision tags

use crate::error::PatternError;

/// Longest id the registry accepts
pub const MAX_ID_LEN: usize = 80;

fn invalid(id: &str, reason: &'static str) -> PatternError {
    PatternError::InvalidId {
        id: id.to_string(),
        reason,
    }
}

/// Validate a resource id
///
/// Checks run in a fixed order so the first violated rule is reported.
pub fn validate_id(id: &str) -> Result<(), PatternError> {
    if id.is_empty() {
        return Err(invalid(id, "must not be empty"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            id,
            "must contain only lowercase letters, digits, '-' and '.'",
        ));
    }
    if uuid::Uuid::parse_str(id).is_ok() {
        return Err(invalid(id, "must not be a UUID"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(invalid(id, "must be at most 80 characters"));
    }
    if id.starts_with(['-', '.']) {
        return Err(invalid(id, "must not start with '-' or '.'"));
    }
    if id.ends_with(['-', '.']) {
        return Err(invalid(id, "must not end with '-' or '.'"));
    }
    Ok(())
}

/// Validate a concrete revision tag
pub fn validate_revision(tag: &str) -> Result<(), PatternError> {
    let charset_ok = tag
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if tag.is_empty() || tag == super::WILDCARD || !charset_ok {
        return Err(PatternError::InvalidRevision(tag.to_string()));
    }
    Ok(())
}
