// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The Tonel file format: data model and structural parsing.
//!
//! A Tonel file stores one class (or trait, extension, or package
//! declaration) per file, as plain text:
//!
//! ```text
//! "An optional class comment"
//! Class {
//!     #name : #Counter,
//!     #superclass : #Object,
//!     #instVars : [ 'value' ]
//! }
//!
//! { #category : #accessing }
//! Counter >> value [
//!     ^ value
//! ]
//! ```
//!
//! The structural parser delimits these regions — comment, class head with
//! its STON metadata, method definitions with their bracketed bodies — and
//! leaves every method body as raw text for the Smalltalk parser. Method
//! body boundaries are found by [`scanner`], which is immune to `]` inside
//! strings, comments, and character literals.

pub mod scanner;
pub mod ston;

mod error;
mod parser;

pub use error::{TonelError, TonelErrorKind};
pub use parser::parse_tonel;
pub use ston::{StonMap, StonValue};

use ecow::EcoString;

/// The kind of top-level declaration in a Tonel file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// A class definition.
    Class,
    /// A trait definition.
    Trait,
    /// An extension (methods added to a class defined elsewhere).
    Extension,
    /// A package declaration (`package.st`).
    Package,
}

impl ClassKind {
    /// Parses a declaration word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "Class" => Some(Self::Class),
            "Trait" => Some(Self::Trait),
            "Extension" => Some(Self::Extension),
            "Package" => Some(Self::Package),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Class => "Class",
            Self::Trait => "Trait",
            Self::Extension => "Extension",
            Self::Package => "Package",
        })
    }
}

/// The class/trait/extension/package declaration heading a Tonel file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    /// The declaration kind.
    pub kind: ClassKind,
    /// The STON metadata map, shape-validated but uninterpreted.
    pub metadata: StonMap,
}

impl ClassDefinition {
    /// The declared `#name`, when present and textual.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(StonValue::as_str)
    }
}

/// One method definition extracted from a Tonel file.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// The optional STON metadata map (typically `{ #category : #… }`).
    pub metadata: Option<StonMap>,
    /// The class the method belongs to.
    pub class_name: EcoString,
    /// `true` for class-side methods (`Counter class >> new`).
    pub is_class_method: bool,
    /// The canonical selector: `value`, `at:put:`, `+`.
    pub selector: EcoString,
    /// The raw body text between the brackets, brackets excluded.
    pub body: EcoString,
    /// 1-based line of the first body character, in file coordinates.
    pub body_start_line: u32,
    /// 1-based column of the first body character on that line.
    pub body_start_column: u32,
}

impl MethodDefinition {
    /// The method's category from its metadata, when present.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get("category")
            .and_then(StonValue::as_str)
    }

    /// The full printed reference, `Counter >> value` or
    /// `Counter class >> new`.
    #[must_use]
    pub fn reference(&self) -> String {
        if self.is_class_method {
            format!("{} class >> {}", self.class_name, self.selector)
        } else {
            format!("{} >> {}", self.class_name, self.selector)
        }
    }
}

/// A successfully parsed Tonel file.
#[derive(Debug, Clone, PartialEq)]
pub struct TonelFile {
    /// The class-level comment, quotes stripped and `""` unescaped.
    pub comment: Option<EcoString>,
    /// The single class declaration.
    pub class_definition: ClassDefinition,
    /// The method definitions, in textual order.
    pub methods: Vec<MethodDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_kind_words() {
        assert_eq!(ClassKind::from_word("Class"), Some(ClassKind::Class));
        assert_eq!(ClassKind::from_word("Trait"), Some(ClassKind::Trait));
        assert_eq!(ClassKind::from_word("Extension"), Some(ClassKind::Extension));
        assert_eq!(ClassKind::from_word("Package"), Some(ClassKind::Package));
        assert_eq!(ClassKind::from_word("Module"), None);
        assert_eq!(ClassKind::Class.to_string(), "Class");
    }

    #[test]
    fn method_reference_formatting() {
        let method = MethodDefinition {
            metadata: None,
            class_name: "Counter".into(),
            is_class_method: false,
            selector: "value".into(),
            body: "^ value".into(),
            body_start_line: 1,
            body_start_column: 1,
        };
        assert_eq!(method.reference(), "Counter >> value");

        let class_side = MethodDefinition {
            is_class_method: true,
            selector: "new".into(),
            ..method
        };
        assert_eq!(class_side.reference(), "Counter class >> new");
    }
}
