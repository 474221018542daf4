// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest TOML parsing

use crate::{Dependency, GeneratedResourceRule, Manifest};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_manifest(&content)
}

/// Parse a manifest from TOML content
pub fn parse_manifest(content: &str) -> Result<Manifest, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let id = optional_str(table, "id", "id")?.unwrap_or_default();

    let mut manifest = Manifest {
        id,
        generated_resources: Vec::new(),
    };

    if let Some(rules) = table.get("generated_resources") {
        let rules = rules.as_array().ok_or_else(|| {
            ParseError::InvalidFormat("generated_resources must be an array of tables".to_string())
        })?;
        for (i, value) in rules.iter().enumerate() {
            let rule = parse_rule(&format!("generated_resources[{i}]"), value)?;
            manifest.generated_resources.push(rule);
        }
    }

    Ok(manifest)
}

fn parse_rule(path: &str, value: &toml::Value) -> Result<GeneratedResourceRule, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{path} must be a table")))?;

    let pattern = required_str(table, "pattern", path)?;
    let action = optional_str(table, "action", path)?.unwrap_or_default();

    let receipt = match table.get("receipt") {
        None => false,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| ParseError::InvalidFormat(format!("{path}.receipt must be a boolean")))?,
    };

    let refresh = match optional_str(table, "refresh", path)? {
        None => None,
        Some(s) => Some(humantime::parse_duration(&s).map_err(|e| {
            ParseError::InvalidFormat(format!("{path}.refresh: {e}"))
        })?),
    };

    let mut dependencies = Vec::new();
    if let Some(deps) = table.get("dependencies") {
        let deps = deps.as_array().ok_or_else(|| {
            ParseError::InvalidFormat(format!("{path}.dependencies must be an array"))
        })?;
        for (i, dep) in deps.iter().enumerate() {
            dependencies.push(parse_dependency(&format!("{path}.dependencies[{i}]"), dep)?);
        }
    }

    Ok(GeneratedResourceRule {
        pattern,
        dependencies,
        action,
        receipt,
        refresh,
    })
}

fn parse_dependency(path: &str, value: &toml::Value) -> Result<Dependency, ParseError> {
    // Shorthand: a bare string is a pattern without a filter
    if let Some(pattern) = value.as_str() {
        return Ok(Dependency::new(pattern));
    }
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{path} must be a string or table")))?;
    Ok(Dependency {
        pattern: required_str(table, "pattern", path)?,
        filter: optional_str(table, "filter", path)?.unwrap_or_default(),
    })
}

fn required_str(table: &toml::Table, key: &str, path: &str) -> Result<String, ParseError> {
    optional_str(table, key, path)?.ok_or_else(|| ParseError::MissingField(format!("{path}.{key}")))
}

fn optional_str(table: &toml::Table, key: &str, path: &str) -> Result<Option<String>, ParseError> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ParseError::InvalidFormat(format!("{path}.{key} must be a string"))),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
