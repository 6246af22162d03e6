// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `tonel-lint` command-line interface.
//!
//! Lints a Tonel `.st` file, or every `.st` file under a directory
//! (skipping `package.st`), for Smalltalk best practices. Exit codes:
//! `0` clean, `1` warnings found, `2` errors found (or invalid usage).

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tonel_core::lint::{run_lint_passes, LintIssue, LintSeverity};
use tonel_core::validate::TonelFullParser;

/// Lint Tonel files for Smalltalk best practices
#[derive(Debug, Parser)]
#[command(name = "tonel-lint")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Tonel file or directory to lint
    target: Utf8PathBuf,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli.target));
}

fn run(target: &Utf8Path) -> i32 {
    if !target.exists() {
        eprintln!("Error: {target} not found");
        return 1;
    }

    let files = match collect_files(target) {
        Ok(files) => files,
        Err(message) => {
            eprintln!("{message}");
            return 1;
        }
    };

    if files.is_empty() {
        println!("No .st files found in {target}");
        return 0;
    }

    println!("Linting Tonel files in {target}");
    println!();

    let mut warnings = 0usize;
    let mut errors = 0usize;

    for file in &files {
        let issues = lint_file(file);
        print_issues(file, &issues, &mut warnings, &mut errors);
    }

    print_summary(files.len(), warnings, errors)
}

/// The `.st` files to lint: the target itself, or a recursive directory
/// sweep with `package.st` excluded.
fn collect_files(target: &Utf8Path) -> Result<Vec<Utf8PathBuf>, String> {
    if target.is_file() {
        if target.extension() != Some("st") {
            return Err(format!("Error: {target} is not a .st file"));
        }
        return Ok(vec![target.to_owned()]);
    }

    let mut files = Vec::new();
    collect_into(target, &mut files);
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_into(path, files);
        } else if path.extension() == Some("st") && path.file_name() != Some("package.st") {
            files.push(path.to_owned());
        }
    }
}

fn lint_file(path: &Utf8Path) -> Vec<LintIssue> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return vec![failure_issue(format!("Failed to read file: {e}"))],
    };
    match TonelFullParser.parse(&content) {
        Ok(file) => run_lint_passes(&file),
        Err(e) => vec![failure_issue(format!("Failed to parse content: {e}"))],
    }
}

fn failure_issue(message: String) -> LintIssue {
    LintIssue {
        severity: LintSeverity::Error,
        message,
        class_name: None,
        selector: None,
        is_class_method: false,
    }
}

fn print_issues(path: &Utf8Path, issues: &[LintIssue], warnings: &mut usize, errors: &mut usize) {
    let name = path.file_name().unwrap_or(path.as_str());

    if issues.is_empty() {
        println!("✓ {name}");
        return;
    }

    println!("⚠ {name}");
    for issue in issues {
        let location = issue
            .location()
            .map(|l| format!("[{l}] "))
            .unwrap_or_default();
        match issue.severity {
            LintSeverity::Error => {
                println!("  ❌ {location}{}", issue.message);
                *errors += 1;
            }
            LintSeverity::Warning => {
                println!("  ⚠️  {location}{}", issue.message);
                *warnings += 1;
            }
        }
    }
    println!();
}

fn print_summary(files_analyzed: usize, warnings: usize, errors: usize) -> i32 {
    println!("─────────────────────────────────");
    println!("Summary:");
    println!("  Files analyzed: {files_analyzed}");
    println!("  Warnings: {warnings}");
    println!("  Errors: {errors}");

    if errors > 0 {
        println!("\n❌ Errors found - consider fixing before import");
        2
    } else if warnings > 0 {
        println!("\n⚠️  Warnings found - review recommended");
        1
    } else {
        println!("\n✓ No issues found");
        0
    }
}
