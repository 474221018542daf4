// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name grammars, compiled once
//!
//! Each kind has a collection grammar and an entity grammar. Lookups walk
//! the table in kind order: project, api, version, spec, deployment,
//! artifact. Artifact grammars capture the parent path and re-enter the
//! entity table, so artifacts may hang off any other kind.

use super::{ProjectName, ResourceName, Revision, WILDCARD};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const ID: &str = r"([-a-z0-9.]+)";
const REVISION: &str = r"(?:@([-a-z0-9]*))?";

fn project_prefix() -> String {
    format!(r"^projects/{ID}(?:/locations/global)?")
}

struct Grammar {
    regex: Regex,
    build: fn(&Captures) -> Option<ResourceName>,
}

// Allow expect here as the patterns are constant and covered by tests
#[allow(clippy::expect_used)]
fn grammar(pattern: String, build: fn(&Captures) -> Option<ResourceName>) -> Grammar {
    Grammar {
        regex: Regex::new(&pattern).expect("constant regex pattern is valid"),
        build,
    }
}

fn cap<'a>(caps: &'a Captures, i: usize) -> Option<&'a str> {
    caps.get(i).map(|m| m.as_str())
}

fn revision(caps: &Captures, i: usize) -> Option<Revision> {
    caps.get(i).map(|m| Revision::parse(m.as_str()))
}

fn project(caps: &Captures) -> Option<ProjectName> {
    Some(ProjectName::new(cap(caps, 1)?))
}

static COLLECTIONS: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    let p = project_prefix();
    vec![
        grammar(r"^projects$".to_string(), |_| {
            Some(ProjectName::new(WILDCARD).into())
        }),
        grammar(format!("{p}/apis$"), |c| Some(project(c)?.api(WILDCARD).into())),
        grammar(format!("{p}/apis/{ID}/versions$"), |c| {
            Some(project(c)?.api(cap(c, 2)?).version(WILDCARD).into())
        }),
        grammar(format!("{p}/apis/{ID}/versions/{ID}/specs$"), |c| {
            Some(
                project(c)?
                    .api(cap(c, 2)?)
                    .version(cap(c, 3)?)
                    .spec(WILDCARD)
                    .into(),
            )
        }),
        grammar(format!("{p}/apis/{ID}/deployments$"), |c| {
            Some(project(c)?.api(cap(c, 2)?).deployment(WILDCARD).into())
        }),
        grammar(r"^(.+)/artifacts$".to_string(), |c| {
            let parent = parse_owner(cap(c, 1)?)?;
            Some(parent.artifact(WILDCARD)?.into())
        }),
    ]
});

static ENTITIES: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    let p = project_prefix();
    let mut table = owner_grammars(&p);
    table.push(grammar(format!(r"^(.+)/artifacts/{ID}$"), |c| {
        let parent = parse_owner(cap(c, 1)?)?;
        Some(parent.artifact(cap(c, 2)?)?.into())
    }));
    table
});

/// Entity grammars of every kind that may own artifacts
static OWNERS: LazyLock<Vec<Grammar>> = LazyLock::new(|| owner_grammars(&project_prefix()));

fn owner_grammars(p: &str) -> Vec<Grammar> {
    vec![
        grammar(format!("{p}$"), |c| Some(project(c)?.into())),
        grammar(format!("{p}/apis/{ID}$"), |c| {
            Some(project(c)?.api(cap(c, 2)?).into())
        }),
        grammar(format!("{p}/apis/{ID}/versions/{ID}$"), |c| {
            Some(project(c)?.api(cap(c, 2)?).version(cap(c, 3)?).into())
        }),
        grammar(format!("{p}/apis/{ID}/versions/{ID}/specs/{ID}{REVISION}$"), |c| {
            let spec = project(c)?
                .api(cap(c, 2)?)
                .version(cap(c, 3)?)
                .spec(cap(c, 4)?);
            Some(match revision(c, 5) {
                Some(r) => spec.with_revision(r).into(),
                None => spec.into(),
            })
        }),
        grammar(format!("{p}/apis/{ID}/deployments/{ID}{REVISION}$"), |c| {
            let deployment = project(c)?.api(cap(c, 2)?).deployment(cap(c, 3)?);
            Some(match revision(c, 4) {
                Some(r) => deployment.with_revision(r).into(),
                None => deployment.into(),
            })
        }),
    ]
}

fn first_match(table: &[Grammar], s: &str) -> Option<ResourceName> {
    table
        .iter()
        .find_map(|g| g.regex.captures(s).and_then(|c| (g.build)(&c)))
}

fn parse_owner(s: &str) -> Option<ResourceName> {
    first_match(&OWNERS, s)
}

pub(super) fn parse_collection(s: &str) -> Option<ResourceName> {
    first_match(&COLLECTIONS, s)
}

pub(super) fn parse_entity(s: &str) -> Option<ResourceName> {
    first_match(&ENTITIES, s)
}
