// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint: long methods.
//!
//! The default budget is 15 lines. Categories that legitimately build large
//! structures (building, initialization, testing, data, examples) get 40.
//! Bodies over 24 lines against the default budget escalate to an error.

use super::{LintIssue, LintSeverity, TonelFile};

/// Default line budget for a method body.
const DEFAULT_LIMIT: usize = 15;

/// Budget for building/initialization/testing/data/examples categories.
const RELAXED_LIMIT: usize = 40;

/// Above this, a default-budget method is an error rather than a warning.
const ERROR_THRESHOLD: usize = 24;

/// Category fragments that grant the relaxed budget.
const RELAXED_CATEGORIES: [&str; 5] =
    ["building", "initialization", "testing", "data", "examples"];

pub(super) fn check(file: &TonelFile, issues: &mut Vec<LintIssue>) {
    for method in &file.methods {
        let body_lines = method.body.trim().lines().count();

        let category = method.category().unwrap_or_default().to_ascii_lowercase();
        let relaxed = RELAXED_CATEGORIES
            .iter()
            .any(|keyword| category.contains(keyword));
        let limit = if relaxed { RELAXED_LIMIT } else { DEFAULT_LIMIT };

        if body_lines <= limit {
            continue;
        }

        if body_lines > ERROR_THRESHOLD && limit == DEFAULT_LIMIT {
            issues.push(LintIssue::method_issue(
                LintSeverity::Error,
                format!("Method too long: {body_lines} lines (limit: {limit})"),
                method,
            ));
        } else {
            issues.push(LintIssue::method_issue(
                LintSeverity::Warning,
                format!("Method long: {body_lines} lines (recommended: {limit})"),
                method,
            ));
        }
    }
}
