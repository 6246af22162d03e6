// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The Tonel structural parser.
//!
//! Walks the file text once, left to right: optional class comment, the
//! class head with its STON map, then method definitions until the input
//! runs out. Method bodies are *not* parsed here — they are carved out with
//! the bracket scanner and kept as raw text, together with the absolute
//! file coordinates of their first character so the Smalltalk parser's
//! errors can be mapped back.
//!
//! The accepted method-reference form is
//! `ClassName [class] >> selector`, where the selector may carry the formal
//! argument names as written in Tonel files (`at: anIndex put: aValue`);
//! the stored selector is canonical (`at:put:`).

use ecow::EcoString;

use crate::source_analysis::{LineIndex, Span};

use super::error::{TonelError, TonelErrorKind};
use super::scanner::{self, Delimiter};
use super::{ston, ClassDefinition, ClassKind, MethodDefinition, StonMap, TonelFile};

/// Parses the structure of a Tonel file.
///
/// `source` is expected to use LF line endings with no byte order mark (the
/// validation facades normalise their input before calling this).
///
/// # Errors
///
/// The first structural error, with byte offsets into `source`.
pub fn parse_tonel(source: &str) -> Result<TonelFile, TonelError> {
    tracing::debug!(len = source.len(), "parsing tonel structure");
    Parser {
        text: source,
        pos: 0,
        line_index: LineIndex::new(source),
    }
    .parse()
}

struct Parser<'src> {
    text: &'src str,
    pos: usize,
    line_index: LineIndex,
}

type TonelResult<T> = Result<T, TonelError>;

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn span_at(&self, pos: usize) -> Span {
        let end = self.text[pos..]
            .chars()
            .next()
            .map_or(pos, |c| pos + c.len_utf8());
        Span::new(pos as u32, end as u32)
    }

    fn here(&self) -> Span {
        self.span_at(self.pos)
    }

    fn err(&self, kind: TonelErrorKind) -> TonelError {
        TonelError::new(kind, self.here())
    }

    fn malformed_reference(&self, message: &str) -> TonelError {
        self.err(TonelErrorKind::MalformedMethodReference(message.into()))
    }

    /// Consumes an identifier (`letter (letter | digit | _)*`), or returns
    /// an empty string when none starts here.
    fn take_identifier(&mut self) -> &str {
        let start = self.pos;
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.bump();
            }
        }
        &self.text[start..self.pos]
    }

    // ========================================================================
    // File structure
    // ========================================================================

    fn parse(mut self) -> TonelResult<TonelFile> {
        self.skip_ws();

        let comment = if self.peek() == Some('"') {
            let text = self.parse_comment()?;
            self.skip_ws();
            Some(text)
        } else {
            None
        };

        let class_definition = self.parse_class_head()?;

        let mut methods = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                break;
            }
            methods.push(self.parse_method()?);
        }

        Ok(TonelFile {
            comment,
            class_definition,
            methods,
        })
    }

    /// `"…"` with doubled quotes as escapes; the cursor is at the opening
    /// quote.
    fn parse_comment(&mut self) -> TonelResult<EcoString> {
        let open = self.pos;
        self.bump(); // "
        let mut content = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(TonelError::new(
                        TonelErrorKind::UnterminatedComment,
                        self.span_at(open),
                    ))
                }
                Some('"') => {
                    if self.peek() == Some('"') {
                        self.bump();
                        content.push('"');
                    } else {
                        return Ok(EcoString::from(content));
                    }
                }
                Some(c) => content.push(c),
            }
        }
    }

    /// `Class|Trait|Extension|Package { … }`.
    fn parse_class_head(&mut self) -> TonelResult<ClassDefinition> {
        let word_start = self.pos;
        let word = self.take_identifier();
        if word.is_empty() {
            return Err(self.err(TonelErrorKind::MissingClassDefinition));
        }
        let Some(kind) = ClassKind::from_word(word) else {
            let word = EcoString::from(word);
            #[allow(clippy::cast_possible_truncation)]
            let span = Span::new(word_start as u32, self.pos as u32);
            return Err(TonelError::new(TonelErrorKind::UnknownClassKind(word), span));
        };

        self.skip_ws();
        if self.peek() != Some('{') {
            return Err(self.err(TonelErrorKind::MissingClassDefinition));
        }
        let metadata = self.parse_metadata_map()?;

        Ok(ClassDefinition { kind, metadata })
    }

    /// A `{ … }` STON map at the cursor. The bracket scanner guards the
    /// balance first so unterminated maps are reported as such.
    fn parse_metadata_map(&mut self) -> TonelResult<StonMap> {
        let open = self.pos;
        if scanner::find_matching(self.text, open, Delimiter::Brace).is_none() {
            return Err(TonelError::new(
                TonelErrorKind::UnterminatedMetadata,
                self.span_at(open),
            ));
        }
        let (map, end) = ston::parse_map_at(self.text, open)?;
        self.pos = end;
        Ok(map)
    }

    /// One method definition: optional metadata, reference, body.
    fn parse_method(&mut self) -> TonelResult<MethodDefinition> {
        let metadata = if self.peek() == Some('{') {
            let map = self.parse_metadata_map()?;
            self.skip_ws();
            Some(map)
        } else {
            None
        };

        if !self.peek().is_some_and(|c| c.is_ascii_uppercase()) {
            // Junk after the last method is trailing content; junk after a
            // metadata map we already committed to is a broken reference.
            return Err(if metadata.is_some() {
                self.malformed_reference("expected a class name after method metadata")
            } else {
                self.err(TonelErrorKind::UnexpectedTrailingContent)
            });
        }

        let class_name = EcoString::from(self.take_identifier());
        self.skip_ws();

        let is_class_method = self.eat_class_marker();
        if is_class_method {
            self.skip_ws();
        }

        if !self.text[self.pos..].starts_with(">>") {
            return Err(self.malformed_reference("expected '>>' in method reference"));
        }
        self.pos += 2;
        self.skip_ws();

        let selector = self.parse_selector()?;

        self.skip_ws();
        if self.peek() != Some('[') {
            return Err(self.malformed_reference("expected '[' to open the method body"));
        }
        let open = self.pos;
        let Some((body, close)) = scanner::extract_delimited(self.text, open, Delimiter::Bracket)
        else {
            return Err(TonelError::new(
                TonelErrorKind::UnbalancedBrackets,
                self.span_at(open),
            ));
        };
        self.pos = close + 1;

        #[allow(clippy::cast_possible_truncation)]
        let position = self.line_index.position(open as u32 + 1);

        Ok(MethodDefinition {
            metadata,
            class_name,
            is_class_method,
            selector,
            body: EcoString::from(body),
            body_start_line: position.line,
            body_start_column: position.column,
        })
    }

    /// Consumes the `class` marker of a class-side method, when present as
    /// a whole word.
    fn eat_class_marker(&mut self) -> bool {
        let rest = &self.text[self.pos..];
        if let Some(after) = rest.strip_prefix("class") {
            let boundary = !after
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
            if boundary {
                self.pos += "class".len();
                return true;
            }
        }
        false
    }

    /// The selector of a method reference: unary, keyword (with optional
    /// formal argument names), or binary (with an optional formal name).
    fn parse_selector(&mut self) -> TonelResult<EcoString> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let first = EcoString::from(self.take_identifier());
                self.skip_ws();
                if self.peek() != Some(':') {
                    return Ok(first); // unary
                }
                self.bump();
                let mut selector = String::from(first.as_str());
                selector.push(':');
                self.parse_keyword_selector_rest(selector)
            }
            Some(c) if is_binary_selector_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_binary_selector_char) {
                    self.bump();
                }
                let selector = EcoString::from(&self.text[start..self.pos]);
                // Optional formal argument name: `+ aNumber [`.
                self.skip_ws();
                if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                    self.take_identifier();
                }
                Ok(selector)
            }
            _ => Err(self.malformed_reference("expected a selector after '>>'")),
        }
    }

    /// Continues a keyword selector after its first `part:`, skipping formal
    /// argument names and collecting further parts.
    fn parse_keyword_selector_rest(&mut self, mut selector: String) -> TonelResult<EcoString> {
        loop {
            self.skip_ws();
            if !self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                break; // `[` or end; the caller validates
            }
            let word = EcoString::from(self.take_identifier());
            self.skip_ws();
            if self.peek() == Some(':') {
                // `word` is the next keyword part.
                self.bump();
                selector.push_str(&word);
                selector.push(':');
                continue;
            }
            // `word` was the formal argument; a further word must be the
            // next keyword part.
            if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                let part = EcoString::from(self.take_identifier());
                self.skip_ws();
                if self.peek() != Some(':') {
                    return Err(
                        self.malformed_reference("expected ':' after keyword selector part")
                    );
                }
                self.bump();
                selector.push_str(&part);
                selector.push(':');
                continue;
            }
            break;
        }
        Ok(EcoString::from(selector))
    }
}

/// Characters accepted in a binary selector at the method-reference level.
fn is_binary_selector_char(c: char) -> bool {
    matches!(
        c,
        '\\' | '+' | '*' | '/' | '=' | '>' | '<' | ',' | '@' | '%' | '~' | '|' | '&' | '-' | '?'
    )
}
