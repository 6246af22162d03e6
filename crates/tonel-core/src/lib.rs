// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser and validator for the Tonel Smalltalk source-code storage format.
//!
//! Tonel is the plain-text, one-class-per-file format used by the Pharo
//! ecosystem to store Smalltalk code. This crate validates Tonel files in
//! two composable stages:
//!
//! 1. **Structural parsing** ([`tonel`]) — delimit the class comment, the
//!    class head with its STON metadata, and each method definition, with
//!    bracket boundaries detected robustly under Smalltalk string literals,
//!    `"…"` comments, and `$x` character literals.
//! 2. **Smalltalk parsing** ([`source_analysis`]) — tokenize and parse each
//!    method body as a full expression sequence, including the
//!    context-sensitive reading of `|` as either a declaration delimiter or
//!    the binary OR operator.
//!
//! The [`validate`] module composes both stages behind three facades, and
//! [`lint`] adds optional style checks over parsed files.
//!
//! # Example
//!
//! ```
//! use tonel_core::prelude::*;
//!
//! let source = "\
//! \"A counter\"
//! Class { #name : #Counter, #superclass : #Object, #instVars : [ 'value' ] }
//!
//! { #category : #accessing }
//! Counter >> value [ ^ value ]
//! ";
//!
//! let file = TonelFullParser.parse(source).unwrap();
//! assert_eq!(file.class_definition.name(), Some("Counter"));
//! assert_eq!(file.methods[0].selector, "value");
//!
//! let validation = TonelFullParser.validate("Class { #name : #C }\nC >> m [ ^ ) ]");
//! assert!(!validation.is_valid());
//! ```

pub mod ast;
pub mod lint;
pub mod source_analysis;
pub mod tonel;
pub mod validate;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Literal, Selector, Sequence};
    pub use crate::tonel::{ClassDefinition, ClassKind, MethodDefinition, TonelFile};
    pub use crate::validate::{
        ParseError, SmalltalkParser, TonelFullParser, TonelParser, Validation, ValidationError,
    };
}
