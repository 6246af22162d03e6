// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing of Smalltalk method bodies.
//!
//! This module owns the second stage of the validation pipeline: given the
//! raw text of a single method body (extracted by [`crate::tonel`]), it
//! tokenizes and parses the text into a [`crate::ast::Sequence`], reporting
//! the first lexical or grammatical failure with a precise [`Span`].
//!
//! # Components
//!
//! - [`Lexer`] — hand-written tokenizer with the block-level pipe state
//! - [`parse_method_body`] — recursive descent over the token stream
//! - [`Span`] / [`LineIndex`] — byte-offset locations and line mapping
//! - [`SmalltalkError`] — the fail-fast error type with taxonomy kinds

mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use error::{LexErrorKind, SmalltalkError, SmalltalkErrorKind};
pub use lexer::{lex, lex_with_eof, Lexer};
pub use parser::parse_method_body;
pub use span::{LineIndex, Position, Span};
pub use token::{Token, TokenKind};
