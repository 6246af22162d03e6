// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source positions for tokens and diagnostics.
//!
//! A [`Span`] records where a token or error sits in the parsed text, as a
//! byte offset plus a byte length. Spans stay byte-based throughout the
//! lexer and parsers; only the diagnostic model converts them, through a
//! [`LineIndex`], into the 1-based line/column pairs that validation
//! reports carry.
//!
//! # Example
//!
//! ```
//! use tonel_core::source_analysis::{LineIndex, Span};
//!
//! let source = "Class { #name : #Counter }\nCounter >> value [ ^ value ]\n";
//! let selector = Span::new(38, 43);
//! assert_eq!(&source[selector.as_range()], "value");
//! assert_eq!(LineIndex::new(source).position(selector.start()).line, 2);
//! ```

use std::ops::Range;

/// A region of source text: a byte offset and a byte length.
///
/// End-of-input markers use a zero-length span at the text's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character.
    offset: u32,
    /// Length in bytes.
    len: u32,
}

impl Span {
    /// Creates a span covering the half-open byte range `start..end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            offset: start,
            len: end.saturating_sub(start),
        }
    }

    /// The byte offset of the first character.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.offset
    }

    /// The byte offset just past the last character.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.offset + self.len
    }

    /// The span as a range suitable for slicing the source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.offset as usize..(self.offset + self.len) as usize
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        Self::new((span.offset as usize).into(), span.len as usize)
    }
}

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters).
    pub column: u32,
}

/// Precomputed line-start table for offset-to-position conversion.
///
/// Built once per source text; lookups are a binary search over the line
/// starts. Input is expected to use LF line endings (the validation facades
/// normalise CRLF before parsing).
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Builds a line index for the given source text.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // source files over 4GB are not supported
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(pos as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-based line/column position.
    ///
    /// Offsets past the end of the source map to the final line.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line];
        Position {
            line: line as u32 + 1,
            column: column + 1,
        }
    }

    /// Returns the number of lines in the indexed source.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Returns the text of the given 1-based line, without its newline.
    ///
    /// Returns an empty string for out-of-range lines.
    #[must_use]
    pub fn line_text<'src>(&self, source: &'src str, line: u32) -> &'src str {
        if line == 0 || line > self.line_count() {
            return "";
        }
        let start = self.line_starts[line as usize - 1] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(source.len(), |&next| next as usize);
        source[start..end].trim_end_matches('\n')
    }
}
