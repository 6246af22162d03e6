// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Smalltalk method bodies.
//!
//! This parser builds a [`Sequence`] from a stream of tokens. Unlike an IDE
//! parser, it performs no error recovery: the first error aborts the parse
//! with a [`SmalltalkError`] carrying the offending span. That matches the
//! validator's contract — report the textually first failure, precisely.
//!
//! # Message Precedence
//!
//! Strict Smalltalk precedence, enforced by the descent order:
//!
//! 1. **Unary messages**: `object message` (highest)
//! 2. **Binary messages**: `3 + 4`, left-associative, no operator table
//! 3. **Keyword messages**: `array at: 1 put: 'x'` (lowest, one per level)
//!
//! # Usage
//!
//! ```
//! use tonel_core::source_analysis::parse_method_body;
//!
//! let sequence = parse_method_body("| sum | sum := 3 + 4. ^ sum").unwrap();
//! assert_eq!(sequence.temporaries.len(), 1);
//! assert_eq!(sequence.statements.len(), 2);
//! ```

use ecow::EcoString;

use crate::ast::{
    is_pseudo_variable, ArrayElement, Block, CascadeMessage, Expression, Literal, Selector,
    Sequence,
};

use super::error::{SmalltalkError, SmalltalkErrorKind};
use super::lexer::lex_with_eof;
use super::{Span, Token, TokenKind};

/// Parses a Smalltalk method body into its statement sequence.
///
/// # Errors
///
/// Returns the first lexical or grammatical error, with byte offsets local
/// to `source`.
pub fn parse_method_body(source: &str) -> Result<Sequence, SmalltalkError> {
    tracing::trace!(len = source.len(), "parsing method body");
    Parser::new(lex_with_eof(source)).parse_root()
}

/// Parses an integer literal's text, including radix forms like `16rFF`.
fn parse_integer(text: &str) -> Option<i64> {
    if let Some((base_part, digits)) = text.split_once('r') {
        let negative = base_part.starts_with('-');
        let base = base_part.trim_start_matches(['-', '+']).parse::<u32>().ok()?;
        if !(2..=36).contains(&base) {
            return None;
        }
        let value = i64::from_str_radix(digits, base).ok()?;
        Some(if negative { -value } else { value })
    } else {
        text.parse().ok()
    }
}

type ParseResult<T> = Result<T, SmalltalkError>;

/// The parser state: a token buffer and a cursor.
struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            matches!(tokens.last().map(Token::kind), Some(TokenKind::Eof)),
            "parser requires an EOF-terminated token stream"
        );
        Self { tokens, current: 0 }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with EOF"))
    }

    fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    fn current_span(&self) -> Span {
        self.current_token().span()
    }

    fn peek_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.current + 1)
            .map_or(&TokenKind::Eof, Token::kind)
    }

    /// Advances past the current token and returns its span.
    fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        span
    }

    fn error(&self, kind: SmalltalkErrorKind) -> SmalltalkError {
        SmalltalkError::new(kind, self.current_span())
    }

    /// Aborts on a lexical-error token at the cursor. Called at every point
    /// where the parser is about to interpret a token, so the textually
    /// first error always wins.
    fn bail_on_lex_error(&self) -> ParseResult<()> {
        if let TokenKind::Error(kind) = self.current_kind() {
            return Err(self.error(SmalltalkErrorKind::Lex(kind.clone())));
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> SmalltalkError {
        self.error(SmalltalkErrorKind::UnexpectedToken {
            found: self.current_kind().describe(),
            expected: expected.into(),
        })
    }

    // ========================================================================
    // Sequences and statements
    // ========================================================================

    /// Parses the whole method body and requires it to be fully consumed.
    fn parse_root(mut self) -> ParseResult<Sequence> {
        let sequence = self.parse_sequence(&[])?;
        if !self.current_kind().is_eof() {
            return Err(self.unexpected("end of method body"));
        }
        Ok(sequence)
    }

    /// Parses `temporaries? statement (. statement)* .?`.
    ///
    /// `parameters` are the enclosing block's parameter names; temporaries
    /// must not re-declare them.
    fn parse_sequence(&mut self, parameters: &[EcoString]) -> ParseResult<Sequence> {
        self.bail_on_lex_error()?;
        let temporaries = if matches!(self.current_kind(), TokenKind::Pipe) {
            self.parse_temporaries(parameters)?
        } else {
            Vec::new()
        };
        let statements = self.parse_statements()?;
        Ok(Sequence::new(temporaries, statements))
    }

    /// Parses `| name* |`, validating every name is bindable and fresh.
    fn parse_temporaries(&mut self, parameters: &[EcoString]) -> ParseResult<Vec<EcoString>> {
        self.advance(); // opening |
        let mut names: Vec<EcoString> = Vec::new();

        loop {
            self.bail_on_lex_error()?;
            match self.current_kind() {
                TokenKind::Identifier(name) => {
                    let name = name.clone();
                    if is_pseudo_variable(&name) {
                        return Err(self.error(SmalltalkErrorKind::ReservedIdentifier(name)));
                    }
                    if names.contains(&name) || parameters.contains(&name) {
                        return Err(self.error(SmalltalkErrorKind::DuplicateTemporary(name)));
                    }
                    self.advance();
                    names.push(name);
                }
                TokenKind::Pipe => {
                    self.advance();
                    return Ok(names);
                }
                other => {
                    return Err(self.error(SmalltalkErrorKind::ExpectedPipe {
                        found: other.describe(),
                    }))
                }
            }
        }
    }

    /// Parses statements until end of input or a closing `]`.
    fn parse_statements(&mut self) -> ParseResult<Vec<Expression>> {
        let mut statements = Vec::new();

        loop {
            self.bail_on_lex_error()?;
            match self.current_kind() {
                TokenKind::Eof | TokenKind::RightBracket => break,
                // Tolerate stray statement separators.
                TokenKind::Period => {
                    self.advance();
                }
                TokenKind::Caret => {
                    self.advance();
                    let value = self.parse_expression()?;
                    statements.push(Expression::Return(Box::new(value)));
                    self.expect_statement_end()?;
                }
                // A pragma statement needs no separator: method bodies write
                // `<primitive: 70>` directly above the first statement.
                TokenKind::BinarySelector(op) if op == "<" => {
                    statements.push(self.parse_pragma()?);
                }
                _ => {
                    statements.push(self.parse_expression()?);
                    self.expect_statement_end()?;
                }
            }
        }

        Ok(statements)
    }

    /// After a statement: a period, end of input, or a closing `]`.
    fn expect_statement_end(&mut self) -> ParseResult<()> {
        self.bail_on_lex_error()?;
        match self.current_kind() {
            TokenKind::Period => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RightBracket => Ok(()),
            _ => Err(self.unexpected("'.' or end of sequence")),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parses any expression.
    ///
    /// Uses `stacker::maybe_grow` to extend the stack on the heap when
    /// remaining space runs low, so deeply nested input cannot overflow.
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.bail_on_lex_error()?;
            if matches!(self.current_kind(), TokenKind::Identifier(_))
                && matches!(self.peek_kind(), TokenKind::Assign)
            {
                return self.parse_assignment();
            }
            self.parse_cascade()
        })
    }

    /// Parses `target := expression`.
    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let TokenKind::Identifier(target) = self.current_kind().clone() else {
            unreachable!("caller checked for an identifier");
        };
        if is_pseudo_variable(&target) {
            return Err(self.error(SmalltalkErrorKind::ReservedIdentifier(target)));
        }
        self.advance(); // target
        self.advance(); // :=
        let value = self.parse_expression()?;
        Ok(Expression::Assignment {
            target,
            value: Box::new(value),
        })
    }

    /// Parses a keyword send, then any cascade continuing it.
    fn parse_cascade(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_keyword_send()?;

        if !matches!(self.current_kind(), TokenKind::Semicolon) {
            return Ok(expr);
        }

        // The first message of the cascade is the one already parsed; its
        // receiver becomes the cascade receiver.
        let (receiver, mut messages) = match expr {
            Expression::MessageSend {
                receiver,
                selector,
                arguments,
            } => (receiver, vec![CascadeMessage::new(selector, arguments)]),
            other => (Box::new(other), Vec::new()),
        };

        while matches!(self.current_kind(), TokenKind::Semicolon) {
            self.advance();
            self.bail_on_lex_error()?;
            messages.push(self.parse_cascade_message()?);
        }

        Ok(Expression::Cascade { receiver, messages })
    }

    /// Parses one message after a cascade `;`.
    fn parse_cascade_message(&mut self) -> ParseResult<CascadeMessage> {
        match self.current_kind().clone() {
            TokenKind::Keyword(_) => {
                let mut parts = Vec::new();
                let mut arguments = Vec::new();
                while let TokenKind::Keyword(part) = self.current_kind().clone() {
                    self.advance();
                    parts.push(part);
                    arguments.push(self.parse_binary_send()?);
                }
                Ok(CascadeMessage::new(Selector::Keyword(parts), arguments))
            }
            TokenKind::BinarySelector(op) => {
                self.advance();
                let argument = self.parse_unary_send()?;
                Ok(CascadeMessage::new(Selector::Binary(op), vec![argument]))
            }
            TokenKind::Identifier(name) if !is_pseudo_variable(&name) => {
                self.advance();
                Ok(CascadeMessage::new(Selector::Unary(name), Vec::new()))
            }
            other => Err(self.error(SmalltalkErrorKind::InvalidSelector(
                ecow::eco_format!("expected a message selector after ';', found {}", other.describe()),
            ))),
        }
    }

    /// Parses a keyword message (lowest precedence).
    fn parse_keyword_send(&mut self) -> ParseResult<Expression> {
        let receiver = self.parse_binary_send()?;

        if !matches!(self.current_kind(), TokenKind::Keyword(_)) {
            return Ok(receiver);
        }

        let mut parts = Vec::new();
        let mut arguments = Vec::new();
        while let TokenKind::Keyword(part) = self.current_kind().clone() {
            self.advance();
            parts.push(part);
            arguments.push(self.parse_binary_send()?);
        }

        Ok(Expression::MessageSend {
            receiver: Box::new(receiver),
            selector: Selector::Keyword(parts),
            arguments,
        })
    }

    /// Parses binary messages, left-associatively and without precedence
    /// between operators.
    fn parse_binary_send(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_send()?;

        while let TokenKind::BinarySelector(op) = self.current_kind().clone() {
            self.advance();
            let right = self.parse_unary_send()?;
            left = Expression::MessageSend {
                receiver: Box::new(left),
                selector: Selector::Binary(op),
                arguments: vec![right],
            };
        }

        Ok(left)
    }

    /// Parses a chain of unary messages (highest precedence).
    fn parse_unary_send(&mut self) -> ParseResult<Expression> {
        let mut receiver = self.parse_primary()?;

        while let TokenKind::Identifier(name) = self.current_kind() {
            // Pseudo-variables cannot be selectors; let the statement layer
            // decide what to make of them.
            if is_pseudo_variable(name) {
                break;
            }
            let selector = Selector::Unary(name.clone());
            self.advance();
            receiver = Expression::MessageSend {
                receiver: Box::new(receiver),
                selector,
                arguments: Vec::new(),
            };
        }

        Ok(receiver)
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        self.bail_on_lex_error()?;
        match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "nil" => Expression::Literal(Literal::Nil),
                    "true" => Expression::Literal(Literal::Boolean(true)),
                    "false" => Expression::Literal(Literal::Boolean(false)),
                    _ => Expression::Variable(name),
                })
            }

            TokenKind::Integer(_)
            | TokenKind::RadixInteger(_)
            | TokenKind::Float(_)
            | TokenKind::ScaledDecimal(_)
            | TokenKind::String(_)
            | TokenKind::Symbol(_)
            | TokenKind::Character(_) => Ok(Expression::Literal(self.parse_literal_token()?)),

            TokenKind::LeftBracket => self.parse_block(),

            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                if !matches!(self.current_kind(), TokenKind::RightParen) {
                    return Err(self.unexpected("')'"));
                }
                self.advance();
                Ok(expr)
            }

            TokenKind::LeftBrace => self.parse_dynamic_array(),

            TokenKind::HashParen => Ok(Expression::LiteralArray(self.parse_literal_array()?)),

            TokenKind::HashBracket => self.parse_byte_array(),

            TokenKind::BinarySelector(op) if op == "<" => self.parse_pragma(),

            other => Err(self.error(SmalltalkErrorKind::ExpectedExpression {
                found: other.describe(),
            })),
        }
    }

    /// Consumes a literal token at the cursor.
    fn parse_literal_token(&mut self) -> ParseResult<Literal> {
        let kind = self.current_kind().clone();
        let literal = match &kind {
            TokenKind::Integer(text) | TokenKind::RadixInteger(text) => {
                let Some(value) = parse_integer(text) else {
                    return Err(self.error(SmalltalkErrorKind::Lex(
                        super::error::LexErrorKind::InvalidNumber(text.clone()),
                    )));
                };
                Literal::Integer(value)
            }
            TokenKind::Float(text) => {
                let Ok(value) = text.parse::<f64>() else {
                    return Err(self.error(SmalltalkErrorKind::Lex(
                        super::error::LexErrorKind::InvalidNumber(text.clone()),
                    )));
                };
                Literal::Float(value)
            }
            TokenKind::ScaledDecimal(text) => {
                let mantissa = text.split('s').next().unwrap_or(text);
                let Ok(value) = mantissa.parse::<f64>() else {
                    return Err(self.error(SmalltalkErrorKind::Lex(
                        super::error::LexErrorKind::InvalidNumber(text.clone()),
                    )));
                };
                Literal::ScaledDecimal(value)
            }
            TokenKind::String(text) => Literal::String(text.clone()),
            TokenKind::Symbol(text) => Literal::Symbol(text.clone()),
            TokenKind::Character(c) => Literal::Character(*c),
            other => {
                return Err(self.error(SmalltalkErrorKind::ExpectedExpression {
                    found: other.describe(),
                }))
            }
        };
        self.advance();
        Ok(literal)
    }

    /// Parses `[ params? temporaries? statements? ]`.
    fn parse_block(&mut self) -> ParseResult<Expression> {
        let open_span = self.advance(); // [

        let mut parameters: Vec<EcoString> = Vec::new();
        loop {
            self.bail_on_lex_error()?;
            match self.current_kind() {
                TokenKind::ColonParam(name) => {
                    let name = name.clone();
                    if is_pseudo_variable(&name) {
                        return Err(self.error(SmalltalkErrorKind::ReservedIdentifier(name)));
                    }
                    if parameters.contains(&name) {
                        return Err(self.error(SmalltalkErrorKind::DuplicateTemporary(name)));
                    }
                    self.advance();
                    parameters.push(name);
                }
                TokenKind::Colon => {
                    return Err(self.error(SmalltalkErrorKind::EmptyBlockParameterList));
                }
                _ => break,
            }
        }

        if !parameters.is_empty() {
            match self.current_kind() {
                TokenKind::Pipe => {
                    self.advance();
                }
                other => {
                    return Err(self.error(SmalltalkErrorKind::ExpectedPipe {
                        found: other.describe(),
                    }))
                }
            }
        }

        let body = if matches!(self.current_kind(), TokenKind::RightBracket) {
            None
        } else {
            Some(self.parse_sequence(&parameters)?)
        };

        match self.current_kind() {
            TokenKind::RightBracket => {
                self.advance();
                Ok(Expression::Block(Block { parameters, body }))
            }
            TokenKind::Eof => Err(SmalltalkError::new(
                SmalltalkErrorKind::UnbalancedBrackets,
                open_span,
            )),
            other => Err(self.error(SmalltalkErrorKind::ExpectedRBracket {
                found: other.describe(),
            })),
        }
    }

    /// Parses `{ expression (. expression)* .? }`.
    fn parse_dynamic_array(&mut self) -> ParseResult<Expression> {
        self.advance(); // {
        let mut expressions = Vec::new();

        loop {
            self.bail_on_lex_error()?;
            match self.current_kind() {
                TokenKind::RightBrace => {
                    self.advance();
                    return Ok(Expression::DynamicArray(expressions));
                }
                TokenKind::Eof => return Err(self.unexpected("'}'")),
                TokenKind::Period => {
                    self.advance();
                }
                _ => {
                    expressions.push(self.parse_expression()?);
                    self.bail_on_lex_error()?;
                    match self.current_kind() {
                        TokenKind::Period => {
                            self.advance();
                        }
                        TokenKind::RightBrace => {}
                        _ => return Err(self.unexpected("'.' or '}'")),
                    }
                }
            }
        }
    }

    /// Parses the elements of `#( … )` or of a bare `( … )` group nested in
    /// one. The opening token is at the cursor.
    fn parse_literal_array(&mut self) -> ParseResult<Vec<ArrayElement>> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.advance(); // #( or (
            let mut elements = Vec::new();

            loop {
                self.bail_on_lex_error()?;
                match self.current_kind().clone() {
                    TokenKind::RightParen => {
                        self.advance();
                        return Ok(elements);
                    }
                    TokenKind::Eof => return Err(self.unexpected("')'")),

                    TokenKind::Integer(_)
                    | TokenKind::RadixInteger(_)
                    | TokenKind::Float(_)
                    | TokenKind::ScaledDecimal(_)
                    | TokenKind::String(_)
                    | TokenKind::Symbol(_)
                    | TokenKind::Character(_) => {
                        elements.push(ArrayElement::Literal(self.parse_literal_token()?));
                    }

                    // Identifiers intern as symbols; the pseudo-literal
                    // spellings keep their values.
                    TokenKind::Identifier(name) => {
                        self.advance();
                        elements.push(ArrayElement::Literal(match name.as_str() {
                            "nil" => Literal::Nil,
                            "true" => Literal::Boolean(true),
                            "false" => Literal::Boolean(false),
                            _ => Literal::Symbol(name),
                        }));
                    }

                    TokenKind::BinarySelector(op) => {
                        self.advance();
                        elements.push(ArrayElement::Literal(Literal::Symbol(op)));
                    }
                    TokenKind::Semicolon => {
                        self.advance();
                        elements.push(ArrayElement::Literal(Literal::Symbol(";".into())));
                    }
                    TokenKind::Comma => {
                        self.advance();
                        elements.push(ArrayElement::Literal(Literal::Symbol(",".into())));
                    }

                    // `#(…)` nests, and so does a bare `(…)` group.
                    TokenKind::HashParen | TokenKind::LeftParen => {
                        elements.push(ArrayElement::Array(self.parse_literal_array()?));
                    }

                    _ => return Err(self.unexpected("a literal array element or ')'")),
                }
            }
        })
    }

    /// Parses `#[ integer* ]` with every element in `0..=255`.
    fn parse_byte_array(&mut self) -> ParseResult<Expression> {
        self.advance(); // #[
        let mut bytes = Vec::new();

        loop {
            self.bail_on_lex_error()?;
            match self.current_kind().clone() {
                TokenKind::RightBracket => {
                    self.advance();
                    return Ok(Expression::ByteArray(bytes));
                }
                TokenKind::Integer(text) => {
                    let span = self.current_span();
                    let Some(value) = parse_integer(&text) else {
                        return Err(self.error(SmalltalkErrorKind::Lex(
                            super::error::LexErrorKind::InvalidNumber(text),
                        )));
                    };
                    if !(0..=255).contains(&value) {
                        return Err(SmalltalkError::new(
                            SmalltalkErrorKind::ByteOutOfRange(value),
                            span,
                        ));
                    }
                    self.advance();
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    bytes.push(value as u8);
                }
                _ => return Err(self.unexpected("a byte value or ']'")),
            }
        }
    }

    /// Parses `< keyword operand … >` or `< identifier >`.
    ///
    /// `<` and `>` are ordinary binary selectors elsewhere; only an operand
    /// position reaches this method.
    fn parse_pragma(&mut self) -> ParseResult<Expression> {
        self.advance(); // <
        self.bail_on_lex_error()?;

        match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                self.expect_pragma_close()?;
                Ok(Expression::Pragma {
                    selector: name,
                    arguments: Vec::new(),
                })
            }
            TokenKind::Keyword(_) => {
                let mut selector = String::new();
                let mut arguments = Vec::new();
                while let TokenKind::Keyword(part) = self.current_kind().clone() {
                    self.advance();
                    selector.push_str(&part);
                    arguments.push(self.parse_pragma_argument()?);
                }
                self.expect_pragma_close()?;
                Ok(Expression::Pragma {
                    selector: selector.into(),
                    arguments,
                })
            }
            other => Err(self.error(SmalltalkErrorKind::InvalidSelector(ecow::eco_format!(
                "expected a pragma selector after '<', found {}",
                other.describe()
            )))),
        }
    }

    /// A pragma argument: a literal, an identifier, a symbol, or an array.
    fn parse_pragma_argument(&mut self) -> ParseResult<Expression> {
        self.bail_on_lex_error()?;
        match self.current_kind().clone() {
            TokenKind::Integer(_)
            | TokenKind::RadixInteger(_)
            | TokenKind::Float(_)
            | TokenKind::ScaledDecimal(_)
            | TokenKind::String(_)
            | TokenKind::Symbol(_)
            | TokenKind::Character(_) => Ok(Expression::Literal(self.parse_literal_token()?)),
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "nil" => Expression::Literal(Literal::Nil),
                    "true" => Expression::Literal(Literal::Boolean(true)),
                    "false" => Expression::Literal(Literal::Boolean(false)),
                    _ => Expression::Variable(name),
                })
            }
            TokenKind::BinarySelector(op) if op != ">" => {
                self.advance();
                Ok(Expression::Literal(Literal::Symbol(op)))
            }
            TokenKind::HashParen => Ok(Expression::LiteralArray(self.parse_literal_array()?)),
            TokenKind::HashBracket => self.parse_byte_array(),
            _ => Err(self.unexpected("a pragma argument")),
        }
    }

    fn expect_pragma_close(&mut self) -> ParseResult<()> {
        match self.current_kind() {
            TokenKind::BinarySelector(op) if op == ">" => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected("'>'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::error::LexErrorKind;

    fn parse(source: &str) -> Sequence {
        parse_method_body(source).unwrap_or_else(|e| panic!("parse failed on {source:?}: {e}"))
    }

    fn parse_err(source: &str) -> SmalltalkError {
        parse_method_body(source).expect_err("expected a parse error")
    }

    #[test]
    fn simple_return() {
        let seq = parse("^ value");
        assert_eq!(seq.statements.len(), 1);
        assert!(matches!(
            &seq.statements[0],
            Expression::Return(inner) if matches!(**inner, Expression::Variable(ref n) if n == "value")
        ));
    }

    #[test]
    fn temporaries() {
        let seq = parse("| a b c | a := 1");
        assert_eq!(seq.temporaries, vec!["a", "b", "c"]);
        assert_eq!(seq.statements.len(), 1);
    }

    #[test]
    fn assignment() {
        let seq = parse("x := 42");
        let Expression::Assignment { target, value } = &seq.statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(target, "x");
        assert!(matches!(**value, Expression::Literal(Literal::Integer(42))));
    }

    #[test]
    fn chained_assignment() {
        let seq = parse("x := y := 1");
        let Expression::Assignment { value, .. } = &seq.statements[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(**value, Expression::Assignment { .. }));
    }

    #[test]
    fn unary_message_chain() {
        let seq = parse("object size printString");
        let Expression::MessageSend {
            receiver, selector, ..
        } = &seq.statements[0]
        else {
            panic!("expected message send");
        };
        assert_eq!(selector.name(), "printString");
        assert!(matches!(
            **receiver,
            Expression::MessageSend { ref selector, .. } if selector.name() == "size"
        ));
    }

    #[test]
    fn binary_is_left_associative_without_precedence() {
        // 2 + 3 * 4 parses as (2 + 3) * 4 in classic Smalltalk.
        let seq = parse("2 + 3 * 4");
        let Expression::MessageSend {
            receiver, selector, ..
        } = &seq.statements[0]
        else {
            panic!("expected message send");
        };
        assert_eq!(selector.name(), "*");
        assert!(matches!(
            **receiver,
            Expression::MessageSend { ref selector, .. } if selector.name() == "+"
        ));
    }

    #[test]
    fn precedence_unary_binary_keyword() {
        // a b + c d: e f: g == ((a b) + (c d)) d:f: (e, g)
        let seq = parse("a b + c d: e f: g");
        let Expression::MessageSend {
            receiver,
            selector,
            arguments,
        } = &seq.statements[0]
        else {
            panic!("expected keyword send");
        };
        assert_eq!(selector.name(), "d:f:");
        assert_eq!(arguments.len(), 2);
        assert!(matches!(arguments[0], Expression::Variable(ref n) if n == "e"));
        assert!(matches!(arguments[1], Expression::Variable(ref n) if n == "g"));

        let Expression::MessageSend {
            receiver: plus_recv,
            selector: plus_sel,
            arguments: plus_args,
        } = &**receiver
        else {
            panic!("expected binary send as keyword receiver");
        };
        assert_eq!(plus_sel.name(), "+");
        assert!(matches!(
            **plus_recv,
            Expression::MessageSend { ref selector, .. } if selector.name() == "b"
        ));
        assert!(matches!(
            plus_args[0],
            Expression::MessageSend { ref selector, .. } if selector.name() == "d"
        ));
    }

    #[test]
    fn cascade_collects_receiver_and_messages() {
        let seq = parse("stream nextPut: $a; nextPut: $b; flush");
        let Expression::Cascade { receiver, messages } = &seq.statements[0] else {
            panic!("expected cascade");
        };
        assert!(matches!(**receiver, Expression::Variable(ref n) if n == "stream"));
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].selector.name(), "nextPut:");
        assert_eq!(messages[1].selector.name(), "nextPut:");
        assert_eq!(messages[2].selector.name(), "flush");
    }

    #[test]
    fn cascade_on_bare_receiver() {
        let seq = parse("Transcript show: 'a'; cr");
        let Expression::Cascade { messages, .. } = &seq.statements[0] else {
            panic!("expected cascade");
        };
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn cascade_needs_a_selector() {
        let err = parse_err("x foo; 1");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::InvalidSelector(_)
        ));
    }

    #[test]
    fn block_with_parameters_and_temporaries() {
        let seq = parse("[:x :y | | sum | sum := x + y. sum] value: 1 value: 2");
        let Expression::MessageSend { receiver, .. } = &seq.statements[0] else {
            panic!("expected keyword send");
        };
        let Expression::Block(block) = &**receiver else {
            panic!("expected block receiver");
        };
        assert_eq!(block.parameters, vec!["x", "y"]);
        let body = block.body.as_ref().expect("block has a body");
        assert_eq!(body.temporaries, vec!["sum"]);
        assert_eq!(body.statements.len(), 2);
    }

    #[test]
    fn empty_block() {
        let seq = parse("^ []");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        let Expression::Block(block) = &**inner else {
            panic!("expected block");
        };
        assert!(block.parameters.is_empty());
        assert!(block.body.is_none());
    }

    #[test]
    fn nested_blocks() {
        let seq = parse("^ [ [ 1 + 2 ] value ] value");
        assert_eq!(seq.statements.len(), 1);
    }

    #[test]
    fn unclosed_block_is_unbalanced_brackets() {
        let err = parse_err("[ 1 + 2");
        assert!(matches!(err.kind, SmalltalkErrorKind::UnbalancedBrackets));
        assert_eq!(err.span.start(), 0);
    }

    #[test]
    fn block_parameters_must_be_bindable() {
        let err = parse_err("[:self | self]");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::ReservedIdentifier(ref n) if n == "self"
        ));
    }

    #[test]
    fn reserved_identifier_in_temporaries() {
        let err = parse_err("| self | self := 1");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::ReservedIdentifier(ref n) if n == "self"
        ));
    }

    #[test]
    fn reserved_identifier_as_assignment_target() {
        for name in ["nil", "true", "false", "self", "super", "thisContext"] {
            let err = parse_err(&format!("{name} := 1"));
            assert!(
                matches!(err.kind, SmalltalkErrorKind::ReservedIdentifier(ref n) if n == name),
                "expected ReservedIdentifier for {name}, got {err:?}"
            );
        }
    }

    #[test]
    fn duplicate_temporary() {
        let err = parse_err("| a a | a := 1");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::DuplicateTemporary(ref n) if n == "a"
        ));
    }

    #[test]
    fn block_temp_cannot_redeclare_parameter() {
        let err = parse_err("[:x | | x | x]");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::DuplicateTemporary(ref n) if n == "x"
        ));
    }

    #[test]
    fn bare_colon_in_block_is_empty_parameter_list() {
        let err = parse_err("[ : | x ]");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::EmptyBlockParameterList
        ));
    }

    #[test]
    fn pseudo_variable_literals() {
        let seq = parse("^ nil");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner) if matches!(**inner, Expression::Literal(Literal::Nil))
        ));

        let seq = parse("^ true");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Literal(Literal::Boolean(true)))
        ));

        let seq = parse("^ self");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Variable(ref n) if n == "self")
        ));
    }

    #[test]
    fn super_send() {
        let seq = parse("^ super new initialize");
        assert_eq!(seq.statements.len(), 1);
    }

    #[test]
    fn number_literals() {
        let seq = parse("^ 16rFF");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Literal(Literal::Integer(255)))
        ));

        let seq = parse("^ 2r1010");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Literal(Literal::Integer(10)))
        ));

        let seq = parse("^ -16r10");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Literal(Literal::Integer(-16)))
        ));

        let seq = parse("^ 3.14s2");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::Literal(Literal::ScaledDecimal(v)) if (v - 3.14).abs() < 1e-9)
        ));
    }

    #[test]
    fn bad_radix_digit_reported() {
        let err = parse_err("^ 2r102");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::Lex(LexErrorKind::BadRadixDigit { digit: '2', radix: 2 })
        ));
    }

    #[test]
    fn radix_base_out_of_range_reported() {
        for source in ["^ 1r0", "^ 37rZ"] {
            let err = parse_err(source);
            assert!(
                matches!(err.kind, SmalltalkErrorKind::Lex(LexErrorKind::InvalidNumber(_))),
                "expected InvalidNumber for {source}, got {err:?}"
            );
        }
    }

    #[test]
    fn literal_array_with_semicolons_and_nested_groups() {
        let seq = parse("^ #(uint64 internal; uint64 internalHigh;)");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        let Expression::LiteralArray(elements) = &**inner else {
            panic!("expected literal array");
        };
        assert_eq!(
            elements
                .iter()
                .filter(|e| matches!(e, ArrayElement::Literal(Literal::Symbol(s)) if s == ";"))
                .count(),
            2
        );
    }

    #[test]
    fn literal_array_bare_group_nests() {
        let seq = parse("^ #(a (b c) d)");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        let Expression::LiteralArray(elements) = &**inner else {
            panic!("expected literal array");
        };
        assert_eq!(elements.len(), 3);
        let ArrayElement::Array(nested) = &elements[1] else {
            panic!("expected nested array, got {:?}", elements[1]);
        };
        assert_eq!(
            nested,
            &vec![
                ArrayElement::Literal(Literal::Symbol("b".into())),
                ArrayElement::Literal(Literal::Symbol("c".into())),
            ]
        );
    }

    #[test]
    fn literal_array_mixed_literals() {
        let seq = parse("^ #(1 2.5 'str' $a #sym foo + nil true false)");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        let Expression::LiteralArray(elements) = &**inner else {
            panic!("expected literal array");
        };
        assert_eq!(elements.len(), 10);
        assert!(matches!(
            elements[5],
            ArrayElement::Literal(Literal::Symbol(ref s)) if s == "foo"
        ));
        assert!(matches!(
            elements[6],
            ArrayElement::Literal(Literal::Symbol(ref s)) if s == "+"
        ));
        assert!(matches!(elements[7], ArrayElement::Literal(Literal::Nil)));
    }

    #[test]
    fn dynamic_array() {
        let seq = parse("^ { 1 + 2. self size. 'x' }");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        let Expression::DynamicArray(exprs) = &**inner else {
            panic!("expected dynamic array");
        };
        assert_eq!(exprs.len(), 3);
    }

    #[test]
    fn empty_dynamic_array() {
        let seq = parse("^ {}");
        assert!(matches!(
            seq.statements[0],
            Expression::Return(ref inner)
                if matches!(**inner, Expression::DynamicArray(ref e) if e.is_empty())
        ));
    }

    #[test]
    fn byte_array() {
        let seq = parse("^ #[1 2 3 255 0]");
        let Expression::Return(inner) = &seq.statements[0] else {
            panic!("expected return");
        };
        assert!(matches!(
            **inner,
            Expression::ByteArray(ref bytes) if bytes == &[1, 2, 3, 255, 0]
        ));
    }

    #[test]
    fn byte_array_range_is_enforced() {
        let err = parse_err("^ #[1 256 3]");
        assert!(matches!(err.kind, SmalltalkErrorKind::ByteOutOfRange(256)));

        let err = parse_err("^ #[-1]");
        assert!(matches!(err.kind, SmalltalkErrorKind::ByteOutOfRange(-1)));
    }

    #[test]
    fn pragmas() {
        let seq = parse("<primitive: 120>\n^ self");
        assert_eq!(seq.statements.len(), 2);
        let Expression::Pragma {
            selector,
            arguments,
        } = &seq.statements[0]
        else {
            panic!("expected pragma, got {:?}", seq.statements[0]);
        };
        assert_eq!(selector, "primitive:");
        assert!(matches!(
            arguments[0],
            Expression::Literal(Literal::Integer(120))
        ));
    }

    #[test]
    fn unary_pragma() {
        let seq = parse("<script>\n^ 1");
        assert!(matches!(
            seq.statements[0],
            Expression::Pragma { ref selector, ref arguments }
                if selector == "script" && arguments.is_empty()
        ));
    }

    #[test]
    fn multi_keyword_pragma() {
        let seq = parse("<primitive: 'name' module: 'module'>\n^ self");
        let Expression::Pragma {
            selector,
            arguments,
        } = &seq.statements[0]
        else {
            panic!("expected pragma");
        };
        assert_eq!(selector, "primitive:module:");
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn statements_need_separators() {
        // `a foo 3` ends the unary chain at the number; with no period the
        // sequence is malformed.
        let err = parse_err("a foo 3");
        assert!(matches!(err.kind, SmalltalkErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn unary_chains_are_one_statement() {
        let seq = parse("a foo b bar");
        assert_eq!(seq.statements.len(), 1);
    }

    #[test]
    fn trailing_period_is_allowed() {
        let seq = parse("a foo.");
        assert_eq!(seq.statements.len(), 1);

        let seq = parse("^ x.");
        assert_eq!(seq.statements.len(), 1);
    }

    #[test]
    fn empty_body_is_valid() {
        assert!(parse("").is_empty());
        assert!(parse("  \n  ").is_empty());
        assert!(parse("\"just a comment\"").is_empty());
    }

    #[test]
    fn unterminated_string_aborts() {
        let err = parse_err("^ 'oops");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::Lex(LexErrorKind::UnterminatedString)
        ));
    }

    #[test]
    fn first_error_wins() {
        // The grammar error at `)` comes before the unterminated string.
        let err = parse_err("^ ) 'oops");
        assert!(matches!(
            err.kind,
            SmalltalkErrorKind::ExpectedExpression { .. }
        ));
    }

    #[test]
    fn missing_paren_close() {
        let err = parse_err("^ (1 + 2");
        assert!(matches!(err.kind, SmalltalkErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn error_positions_are_token_spans() {
        let err = parse_err("value := 1.\nself := 2");
        assert!(matches!(err.kind, SmalltalkErrorKind::ReservedIdentifier(_)));
        assert_eq!(err.span.start(), 12);
    }

    #[test]
    fn bitwise_or_parses_as_binary_send() {
        let seq = parse("| r | r := (a | b). ^ r");
        assert_eq!(seq.temporaries, vec!["r"]);
        let Expression::Assignment { value, .. } = &seq.statements[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(
            **value,
            Expression::MessageSend { ref selector, .. } if selector.name() == "|"
        ));
    }

    #[test]
    fn keyword_message_with_block_arguments() {
        let seq = parse("x > 0 ifTrue: [^ 'positive'] ifFalse: [^ 'negative']");
        let Expression::MessageSend { selector, .. } = &seq.statements[0] else {
            panic!("expected keyword send");
        };
        assert_eq!(selector.name(), "ifTrue:ifFalse:");
    }

    #[test]
    fn parse_integer_helper() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-17"), Some(-17));
        assert_eq!(parse_integer("16rFF"), Some(255));
        assert_eq!(parse_integer("16rff"), Some(255));
        assert_eq!(parse_integer("-16r100"), Some(-256));
        assert_eq!(parse_integer("36rZ"), Some(35));
        assert_eq!(parse_integer("1r0"), None);
        assert_eq!(parse_integer("37r0"), None);
    }
}
