// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for Smalltalk lexing and parsing.
//!
//! Errors carry source locations ([`Span`]) for precise diagnostics and
//! integrate with [`miette`] for rich error reporting. Display strings lead
//! with the error-kind name (`ReservedIdentifier: self`) so the validation
//! facades can surface the taxonomy directly in their `reason` field.

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A lexical error kind.
///
/// The lexer never panics; it embeds these in [`TokenKind::Error`] tokens and
/// the parser aborts at the first one it reaches.
///
/// [`TokenKind::Error`]: super::TokenKind::Error
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    /// A string literal (or quoted symbol) was never closed.
    #[error("UnterminatedString: string literal is never closed")]
    UnterminatedString,

    /// A `"…"` comment was never closed.
    #[error("UnterminatedComment: comment is never closed")]
    UnterminatedComment,

    /// A character that cannot start any token.
    #[error("InvalidCharacter: unexpected character '{0}'")]
    InvalidCharacter(char),

    /// A malformed number literal.
    #[error("InvalidNumber: malformed number literal '{0}'")]
    InvalidNumber(EcoString),

    /// A radix-integer digit that is not valid for its base.
    #[error("BadRadixDigit: digit '{digit}' is not valid in radix {radix}")]
    BadRadixDigit {
        /// The offending digit character.
        digit: char,
        /// The radix declared before the `r`.
        radix: u32,
    },
}

/// An error produced while parsing a Smalltalk method body.
///
/// The first error aborts the parse; there is no recovery.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct SmalltalkError {
    /// What went wrong.
    pub kind: SmalltalkErrorKind,
    /// Where it went wrong, as byte offsets into the method body.
    #[label("here")]
    pub span: Span,
}

impl SmalltalkError {
    /// Creates a new error.
    #[must_use]
    pub fn new(kind: SmalltalkErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of Smalltalk parse error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmalltalkErrorKind {
    /// A lexical error reached by the parser.
    #[error("{0}")]
    Lex(LexErrorKind),

    /// A token that does not fit the grammar at this position.
    #[error("UnexpectedToken: found {found}, expected {expected}")]
    UnexpectedToken {
        /// Description of the offending token.
        found: EcoString,
        /// Description of what the grammar required.
        expected: EcoString,
    },

    /// An operand position with no expression.
    #[error("ExpectedExpression: expected an expression, found {found}")]
    ExpectedExpression {
        /// Description of the offending token.
        found: EcoString,
    },

    /// A missing `|` closing a parameter or temporary declaration.
    #[error("ExpectedPipe: expected '|' to close the declaration, found {found}")]
    ExpectedPipe {
        /// Description of the offending token.
        found: EcoString,
    },

    /// A missing `]` closing a block whose contents ended early.
    #[error("ExpectedRBracket: expected ']' to close the block, found {found}")]
    ExpectedRBracket {
        /// Description of the offending token.
        found: EcoString,
    },

    /// Input ended with a block still open.
    #[error("UnbalancedBrackets: block is never closed")]
    UnbalancedBrackets,

    /// A `:` that introduces no block parameter.
    #[error("EmptyBlockParameterList: ':' must introduce a parameter name")]
    EmptyBlockParameterList,

    /// A pseudo-variable used as an assignment target, temporary, or
    /// block parameter.
    #[error("ReservedIdentifier: {0}")]
    ReservedIdentifier(EcoString),

    /// The same name declared twice in one scope's parameters/temporaries.
    #[error("DuplicateTemporary: '{0}' is declared twice")]
    DuplicateTemporary(EcoString),

    /// A cascade or pragma position with no valid selector.
    #[error("InvalidSelector: {0}")]
    InvalidSelector(EcoString),

    /// A byte-array element outside `0..=255`.
    #[error("ByteOutOfRange: byte array value {0} is not in 0..=255")]
    ByteOutOfRange(i64),
}
