// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `validate-tonel` command-line interface.
//!
//! Validates a single Tonel file, optionally skipping Smalltalk method-body
//! validation. Exit codes: `0` valid, `1` invalid content or unreadable
//! file, `2` usage error (clap's default).

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tonel_core::validate::{TonelFullParser, TonelParser, Validation};

/// Validate Tonel format files and Smalltalk syntax
#[derive(Debug, Parser)]
#[command(name = "validate-tonel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the Tonel file to validate
    file_path: Utf8PathBuf,

    /// Only validate Tonel structure, skip Smalltalk method body validation
    #[arg(long)]
    without_method_body: bool,
}

fn main() {
    // Initialize tracing only when RUST_LOG is explicitly set, keeping the
    // validator's stdout/stderr contract clean otherwise.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    let cli = Cli::parse();
    let ok = validate_file(&cli.file_path, cli.without_method_body);
    std::process::exit(i32::from(!ok));
}

/// Validates one file and prints the outcome. Returns `true` on success.
fn validate_file(path: &Utf8Path, without_method_body: bool) -> bool {
    if !path.exists() {
        eprintln!("Error: File '{path}' not found");
        return false;
    }
    if !path.is_file() {
        eprintln!("Error: '{path}' is not a file");
        return false;
    }

    let validation: Validation = if without_method_body {
        TonelParser.validate_from_file(path.as_std_path())
    } else {
        TonelFullParser.validate_from_file(path.as_std_path())
    };

    match &validation.error {
        None => {
            println!("✓ '{path}' is valid");
            true
        }
        Some(error) => {
            println!("✗ '{path}' contains validation errors");
            eprintln!("Error at line {}: {}", error.line, error.reason);
            if !error.error_text.is_empty() {
                eprintln!(">>> {}", error.error_text);
            }
            false
        }
    }
}
