// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Smalltalk method bodies.
//!
//! This module converts a method body into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over the context-sensitive corners of
//! Smalltalk syntax.
//!
//! # Design Principles
//!
//! - **Error recovery**: never panic on malformed input; emit
//!   [`TokenKind::Error`] and let the parser abort at the first one reached
//! - **Precise spans**: every token carries its exact source location
//! - **Context is block-level position**: the dual reading of `|` is resolved
//!   by where the character sits inside the enclosing block or method body,
//!   never by parenthesis depth
//!
//! # Pipe Disambiguation
//!
//! `|` is either a structural delimiter ([`TokenKind::Pipe`]) or the bitwise
//! OR operator ([`TokenKind::BinarySelector`]). For every block level (the
//! outermost method body counts as one) the lexer keeps a small record:
//!
//! - `saw_params` — a `:param` has been emitted before the first `|`
//! - `params_closed` — the parameter-terminating `|` has been emitted
//! - `temps_opened` / `temps_closed` — the `| temps |` pair state
//! - `executable_seen` — an executable token has been emitted at this level
//!   since the last structural boundary
//!
//! A `|` closes an open temporary declaration, else closes a pending
//! parameter list, else — when nothing executable has been emitted yet and
//! the source ahead reads `ident* |` — opens a temporary declaration.
//! Anything else is the binary operator. Parentheses play no part in this.
//!
//! # Example
//!
//! ```
//! use tonel_core::source_analysis::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("^ count + 1")
//!     .map(|t| t.into_kind())
//!     .collect();
//! assert_eq!(kinds.len(), 4); // ^, count, +, 1
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::error::LexErrorKind;
use super::{Span, Token, TokenKind};

/// Characters that may form a binary selector.
fn is_binary_char(c: char) -> bool {
    matches!(
        c,
        '\\' | '+' | '*' | '/' | '=' | '>' | '<' | ',' | '@' | '%' | '~' | '|' | '&' | '-' | '?'
    )
}

/// Per-block-level state for `|` classification.
#[derive(Debug, Clone, Copy, Default)]
struct BlockLevel {
    /// A `:param` token has been emitted at this level before the first `|`.
    saw_params: bool,
    /// The parameter-terminating `|` has been emitted.
    params_closed: bool,
    /// The opening `|` of a temporary declaration has been emitted.
    temps_opened: bool,
    /// The closing `|` of the temporary declaration has been emitted.
    temps_closed: bool,
    /// An executable token has been emitted since the last structural
    /// boundary (level start or parameter-closing `|`).
    executable_seen: bool,
}

/// A lexer that tokenizes a Smalltalk method body.
///
/// Implements [`Iterator`]; the iterator ends at end of input without an EOF
/// marker — use [`lex_with_eof`] when a trailing [`TokenKind::Eof`] is
/// needed (the parser does).
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Pipe-classification state, innermost block last. Index 0 is the
    /// method body itself and is never popped.
    levels: Vec<BlockLevel>,
    /// Literal-array nesting depth (`#(` and bare `(` groups inside one).
    array_nesting: u32,
    /// Whether the previously emitted token could end an operand. Decides
    /// whether `-`/`+` before digits is a sign or a binary message.
    last_operand_end: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given method body.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            levels: vec![BlockLevel::default()],
            array_nesting: 0,
            last_operand_end: false,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[allow(clippy::cast_possible_truncation)] // method bodies over 4GB are not supported
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to the current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Lexes the next token, or returns `None` at end of input.
    fn next_token(&mut self) -> Option<Token> {
        // Skip whitespace and comments. An unterminated comment becomes an
        // error token rather than silently consuming the rest of the input.
        loop {
            match self.peek_char() {
                None => return None,
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                }
                Some('"') => {
                    let start = self.current_position();
                    if !self.skip_comment() {
                        return Some(Token::new(
                            TokenKind::Error(LexErrorKind::UnterminatedComment),
                            self.span_from(start),
                        ));
                    }
                }
                Some(_) => break,
            }
        }

        let start = self.current_position();
        let c = self.peek_char()?;
        let kind = self.lex_token_kind(c, start);
        let span = self.span_from(start);
        self.note_token(&kind);
        Some(Token::new(kind, span))
    }

    /// Updates pipe-classification and sign-context state after a token.
    fn note_token(&mut self, kind: &TokenKind) {
        match kind {
            TokenKind::ColonParam(_) => {
                let level = self.current_level_mut();
                if !level.params_closed {
                    level.saw_params = true;
                }
            }
            // Structural pipes never count as executable; their flags were
            // already updated during classification.
            TokenKind::Pipe => {}
            TokenKind::LeftBracket | TokenKind::HashBracket => {
                self.current_level_mut().executable_seen = true;
                self.levels.push(BlockLevel::default());
            }
            TokenKind::RightBracket => {
                if self.levels.len() > 1 {
                    self.levels.pop();
                }
                // The closed block is an operand of the enclosing level.
                self.current_level_mut().executable_seen = true;
            }
            TokenKind::Error(_) | TokenKind::Eof => {}
            _ => {
                self.current_level_mut().executable_seen = true;
            }
        }
        self.last_operand_end = kind.is_operand_end();
    }

    fn current_level_mut(&mut self) -> &mut BlockLevel {
        self.levels
            .last_mut()
            .expect("lexer always keeps the method-body level")
    }

    /// Lexes a token kind based on the first (unconsumed) character.
    fn lex_token_kind(&mut self, c: char, start: u32) -> TokenKind {
        match c {
            'a'..='z' | 'A'..='Z' => self.lex_identifier_or_keyword(),

            '0'..='9' => self.lex_number(start),

            '\'' => self.lex_string().map_or_else(
                || TokenKind::Error(LexErrorKind::UnterminatedString),
                TokenKind::String,
            ),

            '$' => {
                self.advance(); // $
                match self.advance() {
                    Some(literal) => TokenKind::Character(literal),
                    None => TokenKind::Error(LexErrorKind::InvalidCharacter('$')),
                }
            }

            '#' => self.lex_symbol_or_array_open(),

            '(' => {
                self.advance();
                if self.array_nesting > 0 {
                    self.array_nesting += 1;
                }
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                self.array_nesting = self.array_nesting.saturating_sub(1);
                TokenKind::RightParen
            }
            '[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            ']' => {
                self.advance();
                TokenKind::RightBracket
            }
            '{' => {
                self.advance();
                TokenKind::LeftBrace
            }
            '}' => {
                self.advance();
                TokenKind::RightBrace
            }
            '^' => {
                self.advance();
                TokenKind::Caret
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '.' => {
                self.advance();
                TokenKind::Period
            }

            ':' => self.lex_colon(),

            '|' => self.lex_pipe(),

            ',' if self.array_nesting > 0 => {
                self.advance();
                TokenKind::Comma
            }

            '-' | '+'
                if !self.last_operand_end && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) =>
            {
                self.advance(); // sign
                self.lex_number(start)
            }

            _ if is_binary_char(c) => self.lex_binary_selector(),

            _ => {
                self.advance();
                TokenKind::Error(LexErrorKind::InvalidCharacter(c))
            }
        }
    }

    /// Lexes an identifier or a keyword-selector part (`ident:`).
    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        // A directly attached colon makes this a keyword part, unless the
        // colon begins `:=`.
        if self.peek_char() == Some(':') && self.peek_char_n(1) != Some('=') {
            self.advance();
            TokenKind::Keyword(EcoString::from(self.text_for(self.span_from(start))))
        } else {
            TokenKind::Identifier(EcoString::from(self.text_for(self.span_from(start))))
        }
    }

    /// Lexes `:=`, a block parameter `:x`, or a bare colon.
    fn lex_colon(&mut self) -> TokenKind {
        self.advance(); // :
        match self.peek_char() {
            Some('=') => {
                self.advance();
                TokenKind::Assign
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let start = self.current_position();
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                TokenKind::ColonParam(EcoString::from(self.text_for(self.span_from(start))))
            }
            _ => TokenKind::Colon,
        }
    }

    /// Classifies a `|` using the current block level's state.
    fn lex_pipe(&mut self) -> TokenKind {
        let level = *self
            .levels
            .last()
            .expect("lexer always keeps the method-body level");

        if level.temps_opened && !level.temps_closed {
            self.advance();
            self.current_level_mut().temps_closed = true;
            return TokenKind::Pipe;
        }

        if level.saw_params && !level.params_closed {
            self.advance();
            let level = self.current_level_mut();
            level.params_closed = true;
            level.executable_seen = false;
            return TokenKind::Pipe;
        }

        if !level.executable_seen && self.looks_like_temp_declaration() {
            self.advance();
            self.current_level_mut().temps_opened = true;
            return TokenKind::Pipe;
        }

        self.lex_binary_selector()
    }

    /// Looks ahead past the current `|` for `ident* |`, the shape of a
    /// temporary declaration. Whitespace and comments are skipped.
    fn looks_like_temp_declaration(&self) -> bool {
        let mut iter = self.chars.clone();
        iter.next(); // the `|` under classification

        let mut peeked = iter.peekable();
        loop {
            match peeked.peek().map(|&(_, c)| c) {
                Some(' ' | '\t' | '\r' | '\n') => {
                    peeked.next();
                }
                Some('"') => {
                    // Comment: skip through its closing quote.
                    peeked.next();
                    loop {
                        match peeked.next().map(|(_, c)| c) {
                            None => return false,
                            Some('"') => {
                                if peeked.peek().map(|&(_, c)| c) == Some('"') {
                                    peeked.next();
                                } else {
                                    break;
                                }
                            }
                            Some(_) => {}
                        }
                    }
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    while peeked
                        .peek()
                        .is_some_and(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                    {
                        peeked.next();
                    }
                }
                Some('|') => return true,
                _ => return false,
            }
        }
    }

    /// Lexes a greedy run of binary-selector characters.
    fn lex_binary_selector(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(is_binary_char);
        TokenKind::BinarySelector(EcoString::from(self.text_for(self.span_from(start))))
    }

    /// Lexes a string literal, returning its unescaped content, or `None`
    /// when the closing quote is missing. Consumes through the closing quote
    /// (or to end of input on failure).
    fn lex_string(&mut self) -> Option<EcoString> {
        self.advance(); // opening quote
        let mut content = String::new();
        loop {
            match self.peek_char() {
                None => return None,
                Some('\'') if self.peek_char_n(1) == Some('\'') => {
                    self.advance();
                    self.advance();
                    content.push('\'');
                }
                Some('\'') => {
                    self.advance();
                    return Some(EcoString::from(content));
                }
                Some(c) => {
                    self.advance();
                    content.push(c);
                }
            }
        }
    }

    /// Lexes everything introduced by `#`: symbols, `#(`, and `#[`.
    fn lex_symbol_or_array_open(&mut self) -> TokenKind {
        self.advance(); // #
        match self.peek_char() {
            Some('(') => {
                self.advance();
                self.array_nesting += 1;
                TokenKind::HashParen
            }
            Some('[') => {
                self.advance();
                TokenKind::HashBracket
            }
            Some('\'') => self.lex_string().map_or_else(
                || TokenKind::Error(LexErrorKind::UnterminatedString),
                TokenKind::Symbol,
            ),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.current_position();
                self.advance();
                loop {
                    match self.peek_char() {
                        Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == ':' => {
                            self.advance();
                        }
                        // `-`, `.`, `/` join a symbol only when more symbol
                        // text follows, so `^ #foo.` keeps its period.
                        Some('-' | '.' | '/')
                            if self
                                .peek_char_n(1)
                                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') =>
                        {
                            self.advance();
                        }
                        _ => break,
                    }
                }
                TokenKind::Symbol(EcoString::from(self.text_for(self.span_from(start))))
            }
            Some(c) if is_binary_char(c) => {
                let start = self.current_position();
                self.advance_while(is_binary_char);
                TokenKind::Symbol(EcoString::from(self.text_for(self.span_from(start))))
            }
            _ => TokenKind::Error(LexErrorKind::InvalidCharacter('#')),
        }
    }

    /// Skips a `"…"` comment (doubled `""` escapes a quote). Returns `false`
    /// when the comment is unterminated.
    fn skip_comment(&mut self) -> bool {
        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                None => return false,
                Some('"') if self.peek_char_n(1) == Some('"') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    return true;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes a number literal. `start` points at the sign when one was
    /// already consumed; the cursor is at the first digit.
    fn lex_number(&mut self, start: u32) -> TokenKind {
        self.advance_while(|c| c.is_ascii_digit());

        // Radix notation: 16rFF, 2r1010
        if self.peek_char() == Some('r')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_alphanumeric())
        {
            self.advance(); // r
            let digits_start = self.current_position();
            self.advance_while(|c| c.is_ascii_alphanumeric());
            return self.radix_token(start, digits_start);
        }

        // Fraction: decimal point directly followed by a digit.
        let mut is_float = false;
        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            self.advance_while(|c| c.is_ascii_digit());
            is_float = true;

            // Scaled decimal: 3.14s2, 3.14s
            if self.peek_char() == Some('s')
                && !self
                    .peek_char_n(1)
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            {
                self.advance(); // s
                self.advance_while(|c| c.is_ascii_digit());
                return TokenKind::ScaledDecimal(EcoString::from(
                    self.text_for(self.span_from(start)),
                ));
            }
        }

        // Exponent: e/E with optional sign, digits required.
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign_offset = usize::from(matches!(self.peek_char_n(1), Some('+' | '-')));
            if self
                .peek_char_n(1 + sign_offset)
                .is_some_and(|c| c.is_ascii_digit())
            {
                self.advance(); // e
                if sign_offset == 1 {
                    self.advance(); // sign
                }
                self.advance_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        let text = EcoString::from(self.text_for(self.span_from(start)));
        if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Integer(text)
        }
    }

    /// Validates a radix literal's base and digits.
    fn radix_token(&self, start: u32, digits_start: u32) -> TokenKind {
        let text = EcoString::from(self.text_for(self.span_from(start)));
        let base_text = &self.source[start as usize..digits_start as usize - 1];
        let base_text = base_text.trim_start_matches(['-', '+']);

        let Ok(radix) = base_text.parse::<u32>() else {
            return TokenKind::Error(LexErrorKind::InvalidNumber(text));
        };
        if !(2..=36).contains(&radix) {
            return TokenKind::Error(LexErrorKind::InvalidNumber(text));
        }
        for digit in self.source[digits_start as usize..self.position].chars() {
            if !digit.to_digit(36).is_some_and(|value| value < radix) {
                return TokenKind::Error(LexErrorKind::BadRadixDigit { digit, radix });
            }
        }
        TokenKind::RadixInteger(text)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenizes a method body, without a trailing EOF marker.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenizes a method body and appends a [`TokenKind::Eof`] token.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut tokens = lex(source);
    let end = source.len() as u32;
    tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(Token::into_kind).collect()
    }

    #[test]
    fn simple_tokens() {
        assert_eq!(
            kinds("^ self"),
            vec![TokenKind::Caret, TokenKind::Identifier("self".into())]
        );
    }

    #[test]
    fn string_literals_unescape_doubled_quotes() {
        assert_eq!(
            kinds("'hello world' 'it''s escaped'"),
            vec![
                TokenKind::String("hello world".into()),
                TokenKind::String("it's escaped".into()),
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        assert_eq!(
            kinds("'oops"),
            vec![TokenKind::Error(LexErrorKind::UnterminatedString)]
        );
    }

    #[test]
    fn comments_are_elided() {
        assert_eq!(
            kinds("\"a note\" x \"with \"\"quotes\"\"\" y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Identifier("y".into()),
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_an_error_token() {
        assert_eq!(
            kinds("x \"oops"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Error(LexErrorKind::UnterminatedComment),
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("at: put: value initialize"),
            vec![
                TokenKind::Keyword("at:".into()),
                TokenKind::Keyword("put:".into()),
                TokenKind::Identifier("value".into()),
                TokenKind::Identifier("initialize".into()),
            ]
        );
    }

    #[test]
    fn assignment_is_not_a_keyword() {
        assert_eq!(
            kinds("x:=1"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Assign,
                TokenKind::Integer("1".into()),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("42 3.14 1.5e-10 16rFF 2r1010 3.14s2 1e5"),
            vec![
                TokenKind::Integer("42".into()),
                TokenKind::Float("3.14".into()),
                TokenKind::Float("1.5e-10".into()),
                TokenKind::RadixInteger("16rFF".into()),
                TokenKind::RadixInteger("2r1010".into()),
                TokenKind::ScaledDecimal("3.14s2".into()),
                TokenKind::Float("1e5".into()),
            ]
        );
    }

    #[test]
    fn negative_number_after_operand_is_a_binary_message() {
        assert_eq!(
            kinds("x - 5"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::BinarySelector("-".into()),
                TokenKind::Integer("5".into()),
            ]
        );
        // Sign attaches in expression positions.
        assert_eq!(
            kinds("^ -5"),
            vec![TokenKind::Caret, TokenKind::Integer("-5".into())]
        );
        assert_eq!(
            kinds("x := -5"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Assign,
                TokenKind::Integer("-5".into()),
            ]
        );
        // After a binary operator the sign also attaches.
        assert_eq!(
            kinds("x + -5"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::BinarySelector("+".into()),
                TokenKind::Integer("-5".into()),
            ]
        );
    }

    #[test]
    fn bad_radix_digit_is_an_error_token() {
        assert_eq!(
            kinds("8r9"),
            vec![TokenKind::Error(LexErrorKind::BadRadixDigit {
                digit: '9',
                radix: 8
            })]
        );
        assert!(matches!(
            kinds("99r0").as_slice(),
            [TokenKind::Error(LexErrorKind::InvalidNumber(_))]
        ));
    }

    #[test]
    fn radix_digits_accept_letters_below_base() {
        assert_eq!(kinds("16rff"), vec![TokenKind::RadixInteger("16rff".into())]);
        assert_eq!(
            kinds("36rZZ"),
            vec![TokenKind::RadixInteger("36rZZ".into())]
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(
            kinds("#symbol #'with spaces' #at:put: #+ #Tonel-Core"),
            vec![
                TokenKind::Symbol("symbol".into()),
                TokenKind::Symbol("with spaces".into()),
                TokenKind::Symbol("at:put:".into()),
                TokenKind::Symbol("+".into()),
                TokenKind::Symbol("Tonel-Core".into()),
            ]
        );
    }

    #[test]
    fn symbol_does_not_swallow_statement_period() {
        assert_eq!(
            kinds("#foo. x"),
            vec![
                TokenKind::Symbol("foo".into()),
                TokenKind::Period,
                TokenKind::Identifier("x".into()),
            ]
        );
    }

    #[test]
    fn character_literals_take_the_next_char_verbatim() {
        assert_eq!(
            kinds("$a $] $' $|"),
            vec![
                TokenKind::Character('a'),
                TokenKind::Character(']'),
                TokenKind::Character('\''),
                TokenKind::Character('|'),
            ]
        );
    }

    #[test]
    fn multi_char_binary_selectors_are_greedy() {
        assert_eq!(
            kinds("a >= b ~= c"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::BinarySelector(">=".into()),
                TokenKind::Identifier("b".into()),
                TokenKind::BinarySelector("~=".into()),
                TokenKind::Identifier("c".into()),
            ]
        );
    }

    // === Pipe disambiguation ===

    fn pipe_kinds(source: &str) -> Vec<TokenKind> {
        kinds(source)
            .into_iter()
            .filter(|k| {
                matches!(k, TokenKind::Pipe)
                    || matches!(k, TokenKind::BinarySelector(op) if op == "|")
            })
            .collect()
    }

    #[test]
    fn method_body_temporaries_are_pipes() {
        assert_eq!(
            pipe_kinds("| r | r := 1"),
            vec![TokenKind::Pipe, TokenKind::Pipe]
        );
    }

    #[test]
    fn bitwise_or_after_expression_is_binary() {
        assert_eq!(
            pipe_kinds("| r | r := a | b"),
            vec![
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::BinarySelector("|".into()),
            ]
        );
    }

    #[test]
    fn parentheses_do_not_affect_pipe_classification() {
        // The `|` inside the parens is binary even though nothing at paren
        // level precedes it.
        assert_eq!(
            pipe_kinds("| r | r := (a | b)"),
            vec![
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::BinarySelector("|".into()),
            ]
        );
    }

    #[test]
    fn block_parameter_pipe_then_binary_or() {
        // [ :x | (a | b) ] — the param-closing pipe is structural, the inner
        // one is the operator.
        assert_eq!(
            pipe_kinds("[ :x | (a | b) ]"),
            vec![TokenKind::Pipe, TokenKind::BinarySelector("|".into())]
        );
        assert_eq!(
            pipe_kinds("[ :x | a | b ]"),
            vec![TokenKind::Pipe, TokenKind::BinarySelector("|".into())]
        );
    }

    #[test]
    fn block_temporaries_after_parameters() {
        assert_eq!(
            pipe_kinds("[ :x | | t | t := x | x ]"),
            vec![
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::BinarySelector("|".into()),
            ]
        );
    }

    #[test]
    fn block_temporaries_without_parameters() {
        assert_eq!(
            pipe_kinds("[ | t | t := a | b ]"),
            vec![
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::BinarySelector("|".into()),
            ]
        );
    }

    #[test]
    fn nested_blocks_track_their_own_levels() {
        // Outer temps, inner params; the or in the inner body is binary.
        assert_eq!(
            pipe_kinds("| a | [ :x | x | a ] value: 1"),
            vec![
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::BinarySelector("|".into()),
            ]
        );
    }

    #[test]
    fn colon_param_tokens() {
        assert_eq!(
            kinds("[ :x :y | x ]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::ColonParam("x".into()),
                TokenKind::ColonParam("y".into()),
                TokenKind::Pipe,
                TokenKind::Identifier("x".into()),
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn comma_is_binary_outside_literal_arrays() {
        assert_eq!(
            kinds("a , b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::BinarySelector(",".into()),
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn comma_is_an_element_inside_literal_arrays() {
        assert_eq!(
            kinds("#(a , b)"),
            vec![
                TokenKind::HashParen,
                TokenKind::Identifier("a".into()),
                TokenKind::Comma,
                TokenKind::Identifier("b".into()),
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn literal_array_contents_keep_their_token_kinds() {
        // Interning identifiers and semicolons as symbols is the parser's
        // job; the lexer only switches `,` to its own kind.
        assert_eq!(
            kinds("#(uint64 internal; nested (a b))"),
            vec![
                TokenKind::HashParen,
                TokenKind::Identifier("uint64".into()),
                TokenKind::Identifier("internal".into()),
                TokenKind::Semicolon,
                TokenKind::Identifier("nested".into()),
                TokenKind::LeftParen,
                TokenKind::Identifier("a".into()),
                TokenKind::Identifier("b".into()),
                TokenKind::RightParen,
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn byte_array_tokens() {
        assert_eq!(
            kinds("#[1 2 255]"),
            vec![
                TokenKind::HashBracket,
                TokenKind::Integer("1".into()),
                TokenKind::Integer("2".into()),
                TokenKind::Integer("255".into()),
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn lex_with_eof_appends_marker() {
        let tokens = lex_with_eof("x");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].kind().is_eof());
        assert_eq!(tokens[1].span(), Span::new(1, 1));
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = lex("at: x");
        assert_eq!(tokens[0].span(), Span::new(0, 3));
        assert_eq!(tokens[1].span(), Span::new(4, 5));
    }
}
