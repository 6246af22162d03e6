// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Smalltalk lexical analysis.
//!
//! # Token Structure
//!
//! Each token consists of a [`TokenKind`] and a [`Span`]. Tokens are cheap to
//! clone ([`EcoString`] payloads). Whitespace and `"…"` comments are elided
//! by the lexer rather than attached as trivia; the validator only needs the
//! positions of significant tokens.
//!
//! # Smalltalk Syntax Coverage
//!
//! - Unary messages: `object message`
//! - Binary messages: `3 + 4`
//! - Keyword messages: `array at: 1 put: value`
//! - Blocks: `[:x | x + 1]`, with `|`-delimited temporaries
//! - Cascades: `stream nextPut: $a; nextPut: $b`
//! - Literal arrays `#(…)`, byte arrays `#[…]`, dynamic arrays `{…}`
//!
//! The `<` and `>` of pragma delimiters have no dedicated kinds: they lex as
//! [`TokenKind::BinarySelector`] and the parser recognises the pragma form
//! contextually.

use ecow::EcoString;

use super::error::LexErrorKind;
use super::Span;

/// The kind of token, not including source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Identifiers and selectors ===
    /// An identifier: `foo`, `myVariable`, `Array`. Pseudo-variables
    /// (`nil`, `true`, `false`, `self`, `super`, `thisContext`) lex as
    /// identifiers; the parser gives them their special meaning.
    Identifier(EcoString),

    /// A keyword selector part, colon included: `at:`, `ifTrue:`
    Keyword(EcoString),

    /// A binary selector: `+`, `<=`, `~=`, `@`, `||`, …
    BinarySelector(EcoString),

    /// A block parameter declaration: `:x` (payload is the identifier).
    ColonParam(EcoString),

    // === Literals ===
    /// A string literal: `'hello'` (payload has `''` unescaped to `'`).
    String(EcoString),

    /// A symbol literal without its `#`: `#foo`, `#at:put:`, `#+`, `#'a b'`.
    Symbol(EcoString),

    /// A character literal: `$a`, `$]`, `$ `.
    Character(char),

    /// A decimal integer literal: `42`, `-17`.
    Integer(EcoString),

    /// A radix integer literal: `16rFF`, `2r1010`, `-16r100`.
    RadixInteger(EcoString),

    /// A floating-point literal: `3.14`, `2.5e10`, `1e5`.
    Float(EcoString),

    /// A scaled-decimal literal: `3.14s2`.
    ScaledDecimal(EcoString),

    // === Delimiters ===
    /// Left parenthesis: `(`
    LeftParen,
    /// Right parenthesis: `)`
    RightParen,
    /// Left bracket (block start): `[`
    LeftBracket,
    /// Right bracket (block end): `]`
    RightBracket,
    /// Left brace (dynamic array start): `{`
    LeftBrace,
    /// Right brace: `}`
    RightBrace,
    /// Literal array open: `#(`
    HashParen,
    /// Byte array open: `#[`
    HashBracket,

    // === Punctuation ===
    /// Assignment operator: `:=`
    Assign,
    /// Return operator: `^`
    Caret,
    /// Statement terminator: `.`
    Period,
    /// Cascade separator: `;`
    Semicolon,
    /// Element separator inside a literal array (elsewhere `,` is a binary
    /// selector character).
    Comma,
    /// Block parameter / temporary delimiter: `|`
    ///
    /// Only structural pipes lex as `Pipe`; a `|` in operator position lexes
    /// as [`TokenKind::BinarySelector`].
    Pipe,
    /// A bare colon that introduces neither `:=` nor a block parameter.
    Colon,

    // === Special ===
    /// End of input.
    Eof,

    /// A lexical error (unterminated string, bad radix digit, …). The parser
    /// aborts when it reaches one of these.
    Error(LexErrorKind),
}

impl TokenKind {
    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::String(_)
                | Self::Symbol(_)
                | Self::Character(_)
                | Self::Integer(_)
                | Self::RadixInteger(_)
                | Self::Float(_)
                | Self::ScaledDecimal(_)
        )
    }

    /// Returns `true` if this token can end an operand.
    ///
    /// Used by the lexer's context rules: a `-` or `+` directly before digits
    /// is a sign only when the previous token could *not* have been a
    /// message receiver.
    #[must_use]
    pub const fn is_operand_end(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::String(_)
                | Self::Symbol(_)
                | Self::Character(_)
                | Self::Integer(_)
                | Self::RadixInteger(_)
                | Self::Float(_)
                | Self::ScaledDecimal(_)
                | Self::RightParen
                | Self::RightBracket
                | Self::RightBrace
        )
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is a lexical-error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the string content if this token carries one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Identifier(s)
            | Self::Keyword(s)
            | Self::BinarySelector(s)
            | Self::ColonParam(s)
            | Self::String(s)
            | Self::Symbol(s)
            | Self::Integer(s)
            | Self::RadixInteger(s)
            | Self::Float(s)
            | Self::ScaledDecimal(s) => Some(s),
            _ => None,
        }
    }

    /// A short human-readable description, used in error messages.
    #[must_use]
    pub fn describe(&self) -> EcoString {
        match self {
            Self::Identifier(s) => ecow::eco_format!("identifier '{s}'"),
            Self::Keyword(s) => ecow::eco_format!("keyword '{s}'"),
            Self::BinarySelector(s) => ecow::eco_format!("binary selector '{s}'"),
            Self::ColonParam(s) => ecow::eco_format!("block parameter ':{s}'"),
            Self::String(_) => "a string literal".into(),
            Self::Symbol(s) => ecow::eco_format!("symbol '#{s}'"),
            Self::Character(c) => ecow::eco_format!("character literal '${c}'"),
            Self::Integer(s) | Self::RadixInteger(s) => ecow::eco_format!("number '{s}'"),
            Self::Float(s) | Self::ScaledDecimal(s) => ecow::eco_format!("number '{s}'"),
            Self::Eof => "end of input".into(),
            Self::Error(_) => "invalid input".into(),
            other => ecow::eco_format!("'{other}'"),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::Keyword(s)
            | Self::BinarySelector(s)
            | Self::Integer(s)
            | Self::RadixInteger(s)
            | Self::Float(s)
            | Self::ScaledDecimal(s) => write!(f, "{s}"),
            Self::ColonParam(s) => write!(f, ":{s}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Symbol(s) => write!(f, "#{s}"),
            Self::Character(c) => write!(f, "${c}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::HashParen => write!(f, "#("),
            Self::HashBracket => write!(f, "#["),
            Self::Assign => write!(f, ":="),
            Self::Caret => write!(f, "^"),
            Self::Period => write!(f, "."),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::Pipe => write!(f, "|"),
            Self::Colon => write!(f, ":"),
            Self::Eof => write!(f, "<eof>"),
            Self::Error(kind) => write!(f, "<error: {kind}>"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}
