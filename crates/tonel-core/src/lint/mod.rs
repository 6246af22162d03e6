// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lint passes for Tonel files.
//!
//! Lint checks are style/quality checks over a successfully parsed
//! [`TonelFile`], distinct from validation errors: a file can be perfectly
//! valid Tonel and still collect lint issues. They are only reported by the
//! `tonel-lint` tool, never during validation.
//!
//! Each lint pass takes a [`TonelFile`] reference and appends
//! [`LintIssue`]s.
//!
//! # Adding a New Lint
//!
//! 1. Write a module with `check(file: &TonelFile, issues: &mut Vec<LintIssue>)`.
//! 2. Call it from [`run_lint_passes`].

mod class_prefix;
mod direct_access;
mod instance_variables;
mod method_length;

use ecow::EcoString;

use crate::tonel::TonelFile;

/// Lint issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintSeverity {
    /// Worth reviewing before import.
    Warning,
    /// Should be fixed before import.
    Error,
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// How serious the finding is.
    pub severity: LintSeverity,
    /// Description of the issue.
    pub message: String,
    /// The class the issue was found in, when known.
    pub class_name: Option<EcoString>,
    /// The method selector, when the issue is method-level.
    pub selector: Option<EcoString>,
    /// Whether the method is class-side.
    pub is_class_method: bool,
}

impl LintIssue {
    /// Creates a class-level warning.
    #[must_use]
    pub fn class_warning(message: impl Into<String>, class_name: impl Into<EcoString>) -> Self {
        Self {
            severity: LintSeverity::Warning,
            message: message.into(),
            class_name: Some(class_name.into()),
            selector: None,
            is_class_method: false,
        }
    }

    /// Creates a method-level issue.
    #[must_use]
    pub fn method_issue(
        severity: LintSeverity,
        message: impl Into<String>,
        method: &crate::tonel::MethodDefinition,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            class_name: Some(method.class_name.clone()),
            selector: Some(method.selector.clone()),
            is_class_method: method.is_class_method,
        }
    }

    /// The `[Class>>selector]` location prefix, when any location is known.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        let class_name = self.class_name.as_ref()?;
        match &self.selector {
            Some(selector) if self.is_class_method => {
                Some(format!("{class_name} class>>{selector}"))
            }
            Some(selector) => Some(format!("{class_name}>>{selector}")),
            None => Some(class_name.to_string()),
        }
    }
}

/// Runs every lint pass over a parsed file.
#[must_use]
pub fn run_lint_passes(file: &TonelFile) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    class_prefix::check(file, &mut issues);
    instance_variables::check(file, &mut issues);
    method_length::check(file, &mut issues);
    direct_access::check(file, &mut issues);
    issues
}

/// Instance-variable names declared by the class, for passes that need
/// them.
pub(crate) fn instance_variables(file: &TonelFile) -> Vec<&str> {
    file.class_definition
        .metadata
        .get("instVars")
        .and_then(crate::tonel::StonValue::as_list)
        .map(|items| items.iter().filter_map(crate::tonel::StonValue::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn lint_source(source: &str) -> Vec<LintIssue> {
    let file = crate::validate::TonelFullParser
        .parse(source)
        .expect("lint test input parses");
    run_lint_passes(&file)
}
