// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint: too many instance variables suggest mixed responsibilities.

use super::{instance_variables, LintIssue, TonelFile};

/// Instance-variable count above which a class is flagged.
const MAX_INSTANCE_VARIABLES: usize = 10;

pub(super) fn check(file: &TonelFile, issues: &mut Vec<LintIssue>) {
    let count = instance_variables(file).len();
    if count > MAX_INSTANCE_VARIABLES {
        let class_name = file.class_definition.name().unwrap_or_default();
        issues.push(LintIssue::class_warning(
            format!("Too many instance variables: {count} (consider splitting responsibilities)"),
            class_name,
        ));
    }
}
