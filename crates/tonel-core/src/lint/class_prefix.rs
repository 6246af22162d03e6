// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint: classes should carry a project prefix.
//!
//! Pharo convention gives shared code a short uppercase prefix (`ZnServer`,
//! `MCPackage`, `RbNode`) so class names don't collide across projects.
//! Accepted shapes:
//!
//! - two or more leading uppercase letters: `STClass`, `MCPackage`
//! - uppercase, lowercase, uppercase: `ZnServer`, `RbNode`
//!
//! `BaselineOf*` classes and `*Test` classes are exempt.

use super::{LintIssue, TonelFile};

pub(super) fn check(file: &TonelFile, issues: &mut Vec<LintIssue>) {
    let Some(class_name) = file.class_definition.name() else {
        return;
    };
    if class_name.is_empty()
        || class_name.starts_with("BaselineOf")
        || class_name.ends_with("Test")
    {
        return;
    }

    if !has_project_prefix(class_name) {
        issues.push(LintIssue::class_warning(
            "No class prefix (consider adding project prefix)",
            class_name,
        ));
    }
}

fn has_project_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    let (Some(first), Some(second), Some(third)) = (chars.next(), chars.next(), chars.next())
    else {
        return false;
    };
    (first.is_ascii_uppercase() && second.is_ascii_uppercase())
        || (first.is_ascii_uppercase() && second.is_ascii_lowercase() && third.is_ascii_uppercase())
}
