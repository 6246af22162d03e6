// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint: direct instance-variable access outside accessors.
//!
//! Writing `value := …` or `^ value` from an ordinary method couples it to
//! the class's storage layout; going through `self value` keeps subclasses
//! free to override. Accessor methods (category contains `accessing`) and
//! initializers (category contains `initializ`) are exempt — direct access
//! is their job.
//!
//! The check is line-based over the raw body text, one finding per line.

use super::{instance_variables, LintIssue, LintSeverity, TonelFile};
use crate::tonel::MethodDefinition;

pub(super) fn check(file: &TonelFile, issues: &mut Vec<LintIssue>) {
    let inst_vars = instance_variables(file);
    if inst_vars.is_empty() {
        return;
    }

    for method in &file.methods {
        if is_exempt(method) {
            continue;
        }

        for line in method.body.trim().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for var in &inst_vars {
                if let Some(at) = direct_access_position(line, var) {
                    if !line[..at].contains("self") {
                        issues.push(LintIssue::method_issue(
                            LintSeverity::Warning,
                            format!("Direct access to '{var}' (use self {var})"),
                            method,
                        ));
                        break;
                    }
                }
            }
        }
    }
}

fn is_exempt(method: &MethodDefinition) -> bool {
    let category = method.category().unwrap_or_default().to_ascii_lowercase();
    category.contains("accessing") || category.contains("initializ")
}

/// Finds a direct access to `var` in `line`: an assignment `var :=` or a
/// leading return `^ var`. Returns the variable's byte position.
fn direct_access_position(line: &str, var: &str) -> Option<usize> {
    if let Some(at) = find_assignment(line, var) {
        return Some(at);
    }
    find_leading_return(line, var)
}

/// `var :=` with word boundaries around `var`.
fn find_assignment(line: &str, var: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(found) = line[search_from..].find(var) {
        let at = search_from + found;
        let end = at + var.len();
        let boundary_before = at == 0 || !is_word_char(line[..at].chars().next_back()?);
        let boundary_after = !line[end..].chars().next().is_some_and(is_word_char);
        if boundary_before && boundary_after && line[end..].trim_start().starts_with(":=") {
            return Some(at);
        }
        search_from = end.max(search_from + 1);
    }
    None
}

/// `^ var` at the start of the (trimmed) line, with a boundary after.
fn find_leading_return(line: &str, var: &str) -> Option<usize> {
    let rest = line.strip_prefix('^')?;
    let trimmed = rest.trim_start();
    let offset = line.len() - trimmed.len();
    let after = trimmed.strip_prefix(var)?;
    if after.chars().next().is_some_and(is_word_char) {
        return None;
    }
    Some(offset)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
