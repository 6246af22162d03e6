// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Tonel structural parser.

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::source_analysis::Span;

/// An error produced while parsing the structure of a Tonel file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct TonelError {
    /// What went wrong.
    pub kind: TonelErrorKind,
    /// Where it went wrong, as byte offsets into the (normalised) file text.
    #[label("here")]
    pub span: Span,
}

impl TonelError {
    /// Creates a new structural error.
    #[must_use]
    pub fn new(kind: TonelErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of Tonel structural error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TonelErrorKind {
    /// The file has no `Class`/`Trait`/`Extension`/`Package` declaration.
    #[error("MissingClassDefinition: no Class, Trait, Extension or Package declaration found")]
    MissingClassDefinition,

    /// The declaration word is not a recognised kind.
    #[error("UnknownClassKind: '{0}' is not a recognised declaration kind")]
    UnknownClassKind(EcoString),

    /// A method reference that does not read `ClassName [class] >> selector`.
    #[error("MalformedMethodReference: {0}")]
    MalformedMethodReference(EcoString),

    /// A `{ … }` metadata map that is never closed.
    #[error("UnterminatedMetadata: metadata map is never closed")]
    UnterminatedMetadata,

    /// A STON metadata map whose contents do not parse.
    #[error("MalformedMetadata: {0}")]
    MalformedMetadata(EcoString),

    /// A method body `[` with no matching `]`.
    #[error("UnbalancedBrackets: method body is never closed")]
    UnbalancedBrackets,

    /// The class-level `"…"` comment is never closed.
    #[error("UnterminatedComment: class comment is never closed")]
    UnterminatedComment,

    /// Content after the last method definition that is not whitespace.
    #[error("UnexpectedTrailingContent: unexpected content after the last definition")]
    UnexpectedTrailingContent,
}
