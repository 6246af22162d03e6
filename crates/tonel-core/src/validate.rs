// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser facades and the validation surface.
//!
//! Three stateless facades compose the same engines:
//!
//! | Facade | Scope |
//! |---|---|
//! | [`TonelParser`] | Tonel structure only |
//! | [`SmalltalkParser`] | a single Smalltalk method body |
//! | [`TonelFullParser`] | structure plus every method body |
//!
//! Each offers `parse`/`parse_from_file` returning the tree or a
//! [`ParseError`], and `validate`/`validate_from_file` returning a
//! [`Validation`] that never fails: any error is folded into a
//! `(reason, line, error_text)` record with 1-based absolute line numbers.
//!
//! Input text is normalised before parsing: a leading byte order mark is
//! stripped and CRLF line endings become LF, so line counting is uniform.
//!
//! # Example
//!
//! ```
//! use tonel_core::validate::TonelFullParser;
//!
//! let source = "Class { #name : #Counter }\nCounter >> value [ ^ value ]\n";
//! let validation = TonelFullParser.validate(source);
//! assert!(validation.is_valid());
//! ```

use std::borrow::Cow;
use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Sequence;
use crate::source_analysis::{parse_method_body, LineIndex, SmalltalkError};
use crate::tonel::{parse_tonel, TonelError, TonelFile};

/// Width of the `error_text` window, in characters.
const ERROR_TEXT_WIDTH: usize = 80;

/// A structured parse failure from any facade.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The Tonel structure is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] TonelError),

    /// A standalone method body is invalid (from [`SmalltalkParser`]).
    #[error("{error}")]
    Smalltalk {
        /// The underlying Smalltalk error.
        #[source]
        error: SmalltalkError,
        /// 1-based line within the method body.
        line: u32,
        /// 1-based column within that line.
        column: u32,
    },

    /// A method body inside a Tonel file is invalid (from
    /// [`TonelFullParser`]); coordinates are absolute file positions.
    #[error("invalid Smalltalk syntax in method {reference}: {error}")]
    Method {
        /// The failing method, `Counter >> value`.
        reference: String,
        /// The underlying Smalltalk error.
        #[source]
        error: SmalltalkError,
        /// 1-based absolute line in the file.
        line: u32,
        /// 1-based column within that line.
        column: u32,
    },

    /// The input file does not exist.
    #[error("FileNotFound: file '{path}' not found")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// The input file exists but could not be read as UTF-8 text.
    #[error("ReadError: failed to read '{path}': {source}")]
    ReadError {
        /// The unreadable path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The `(ok, error_info?)` validation shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    /// The first failure, or `None` when the input is valid.
    pub error: Option<ValidationError>,
}

impl Validation {
    /// A successful validation.
    #[must_use]
    pub fn valid() -> Self {
        Self { error: None }
    }

    /// Returns `true` when no error was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Uniform error information surfaced by `validate*` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Human-readable reason, leading with the error kind
    /// (`ReservedIdentifier: self`).
    pub reason: String,
    /// 1-based line number, absolute within the validated input.
    pub line: u32,
    /// The offending source line, trimmed and capped at 80 characters.
    pub error_text: String,
}

/// Strips a leading BOM and normalises CRLF line endings to LF.
#[must_use]
pub fn normalize_source(source: &str) -> Cow<'_, str> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    if source.contains("\r\n") {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// The trimmed text of `line` (1-based), capped at the window width.
fn error_line_text(source: &str, line: u32) -> String {
    let text = source
        .lines()
        .nth(line.saturating_sub(1) as usize)
        .unwrap_or("")
        .trim();
    if text.chars().count() > ERROR_TEXT_WIDTH {
        text.chars().take(ERROR_TEXT_WIDTH).collect()
    } else {
        text.to_owned()
    }
}

/// Folds a [`ParseError`] into validation error info against the normalised
/// source it was produced from.
fn validation_error(source: &str, error: &ParseError) -> ValidationError {
    match error {
        ParseError::Structure(e) => {
            let line = LineIndex::new(source).position(e.span.start()).line;
            ValidationError {
                reason: e.to_string(),
                line,
                error_text: error_line_text(source, line),
            }
        }
        ParseError::Smalltalk { error: e, line, .. } | ParseError::Method { error: e, line, .. } => {
            ValidationError {
                reason: e.to_string(),
                line: *line,
                error_text: error_line_text(source, *line),
            }
        }
        ParseError::FileNotFound { path } | ParseError::ReadError { path, .. } => ValidationError {
            reason: error.to_string(),
            line: 1,
            error_text: path.clone(),
        },
    }
}

fn read_file(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|source| {
        let path = path.display().to_string();
        if source.kind() == std::io::ErrorKind::NotFound {
            ParseError::FileNotFound { path }
        } else {
            ParseError::ReadError { path, source }
        }
    })
}

fn io_validation(error: &ParseError) -> Validation {
    Validation {
        error: Some(validation_error("", error)),
    }
}

/// Structure-only Tonel parsing: method bodies are delimited but not
/// parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TonelParser;

impl TonelParser {
    /// Parses the Tonel structure of `source`.
    ///
    /// # Errors
    ///
    /// The first structural error.
    pub fn parse(&self, source: &str) -> Result<TonelFile, ParseError> {
        let source = normalize_source(source);
        Ok(parse_tonel(&source)?)
    }

    /// Reads and parses a Tonel file.
    ///
    /// # Errors
    ///
    /// I/O failures and structural errors.
    pub fn parse_from_file(&self, path: &Path) -> Result<TonelFile, ParseError> {
        self.parse(&read_file(path)?)
    }

    /// Validates the Tonel structure of `source`.
    #[must_use]
    pub fn validate(&self, source: &str) -> Validation {
        let normalized = normalize_source(source);
        match parse_tonel(&normalized) {
            Ok(_) => Validation::valid(),
            Err(e) => Validation {
                error: Some(validation_error(&normalized, &ParseError::Structure(e))),
            },
        }
    }

    /// Reads and validates a Tonel file.
    #[must_use]
    pub fn validate_from_file(&self, path: &Path) -> Validation {
        match read_file(path) {
            Ok(text) => self.validate(&text),
            Err(e) => io_validation(&e),
        }
    }
}

/// Parsing of a single Smalltalk method body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmalltalkParser;

impl SmalltalkParser {
    /// Parses `source` as one method body.
    ///
    /// # Errors
    ///
    /// The first lexical or grammatical error, with body-local coordinates.
    pub fn parse(&self, source: &str) -> Result<Sequence, ParseError> {
        let normalized = normalize_source(source);
        parse_method_body(&normalized).map_err(|error| {
            let position = LineIndex::new(&normalized).position(error.span.start());
            ParseError::Smalltalk {
                error,
                line: position.line,
                column: position.column,
            }
        })
    }

    /// Reads and parses a file containing one method body.
    ///
    /// # Errors
    ///
    /// I/O failures and Smalltalk errors.
    pub fn parse_from_file(&self, path: &Path) -> Result<Sequence, ParseError> {
        self.parse(&read_file(path)?)
    }

    /// Validates `source` as one method body.
    #[must_use]
    pub fn validate(&self, source: &str) -> Validation {
        let normalized = normalize_source(source);
        match self.parse(source) {
            Ok(_) => Validation::valid(),
            Err(e) => Validation {
                error: Some(validation_error(&normalized, &e)),
            },
        }
    }

    /// Reads and validates a file containing one method body.
    #[must_use]
    pub fn validate_from_file(&self, path: &Path) -> Validation {
        match read_file(path) {
            Ok(text) => self.validate(&text),
            Err(e) => io_validation(&e),
        }
    }
}

/// Full validation: Tonel structure plus every method body.
#[derive(Debug, Clone, Copy, Default)]
pub struct TonelFullParser;

impl TonelFullParser {
    /// Parses `source` and validates every method body, reporting the
    /// textually first failure with absolute file coordinates.
    ///
    /// # Errors
    ///
    /// The first structural or Smalltalk error.
    pub fn parse(&self, source: &str) -> Result<TonelFile, ParseError> {
        let normalized = normalize_source(source);
        let file = parse_tonel(&normalized)?;

        for method in &file.methods {
            if let Err(error) = parse_method_body(&method.body) {
                let local = LineIndex::new(&method.body).position(error.span.start());
                let line = method.body_start_line + local.line - 1;
                let column = if local.line == 1 {
                    method.body_start_column + local.column - 1
                } else {
                    local.column
                };
                tracing::debug!(
                    method = %method.reference(),
                    line,
                    "method body failed validation"
                );
                return Err(ParseError::Method {
                    reference: method.reference(),
                    error,
                    line,
                    column,
                });
            }
        }

        Ok(file)
    }

    /// Reads, parses, and fully validates a Tonel file.
    ///
    /// # Errors
    ///
    /// I/O failures, structural errors, and Smalltalk errors.
    pub fn parse_from_file(&self, path: &Path) -> Result<TonelFile, ParseError> {
        self.parse(&read_file(path)?)
    }

    /// Fully validates `source`.
    #[must_use]
    pub fn validate(&self, source: &str) -> Validation {
        let normalized = normalize_source(source);
        match self.parse(source) {
            Ok(_) => Validation::valid(),
            Err(e) => Validation {
                error: Some(validation_error(&normalized, &e)),
            },
        }
    }

    /// Reads and fully validates a Tonel file.
    #[must_use]
    pub fn validate_from_file(&self, path: &Path) -> Validation {
        match read_file(path) {
            Ok(text) => self.validate(&text),
            Err(e) => io_validation(&e),
        }
    }
}
