// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Delimiter matching that respects Smalltalk lexical islands.
//!
//! Bracket counting is the only robust way to delimit a Tonel method body: a
//! naive scan breaks on `$]`, `'text with ] inside'`, and `"comment with ]
//! inside"`. This scanner walks the text with a four-state machine and is
//! used everywhere bracket or brace boundaries are needed — method bodies
//! and STON metadata maps alike.
//!
//! States:
//!
//! - `Normal` — count delimiters; `'` enters a string, `"` a comment, `$`
//!   a character literal
//! - `InString` — doubled `''` stays inside, a single `'` leaves
//! - `InComment` — doubled `""` stays inside, a single `"` leaves
//! - `AfterDollar` — exactly one character is consumed verbatim; this is
//!   the only way a bare `]` after `$` is ignored

/// Which delimiter pair to balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `[` … `]` — method bodies and STON lists.
    Bracket,
    /// `{` … `}` — STON maps.
    Brace,
}

impl Delimiter {
    const fn open(self) -> char {
        match self {
            Self::Bracket => '[',
            Self::Brace => '{',
        }
    }

    const fn close(self) -> char {
        match self {
            Self::Bracket => ']',
            Self::Brace => '}',
        }
    }
}

/// Scanner state while looking for the matching closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InString,
    InComment,
    AfterDollar,
}

/// Finds the byte offset of the delimiter matching the opener at `open_at`.
///
/// `text[open_at]` must be the opening delimiter. Returns `None` when the
/// end of input is reached with the delimiter still open.
///
/// # Panics
///
/// Panics if `open_at` does not point at the opening delimiter (a caller
/// bug, not an input error).
#[must_use]
pub fn find_matching(text: &str, open_at: usize, delimiter: Delimiter) -> Option<usize> {
    let open = delimiter.open();
    let close = delimiter.close();
    assert_eq!(
        text[open_at..].chars().next(),
        Some(open),
        "open_at must point at '{open}'"
    );

    let mut depth = 1u32;
    let mut state = State::Normal;

    for (offset, c) in text[open_at + open.len_utf8()..].char_indices() {
        match state {
            State::Normal => {
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open_at + open.len_utf8() + offset);
                    }
                } else {
                    match c {
                        '\'' => state = State::InString,
                        '"' => state = State::InComment,
                        '$' => state = State::AfterDollar,
                        _ => {}
                    }
                }
            }
            // Doubled quotes inside strings/comments are handled without
            // lookahead: the first quote leaves the island, the second
            // immediately re-enters it.
            State::InString => {
                if c == '\'' {
                    state = State::Normal;
                }
            }
            State::InComment => {
                if c == '"' {
                    state = State::Normal;
                }
            }
            State::AfterDollar => state = State::Normal,
        }
    }

    None
}

/// Extracts the content between the opener at `open_at` and its matching
/// closer, both exclusive. Returns the content and the closer's offset.
#[must_use]
pub fn extract_delimited(text: &str, open_at: usize, delimiter: Delimiter) -> Option<(&str, usize)> {
    let close_at = find_matching(text, open_at, delimiter)?;
    Some((&text[open_at + 1..close_at], close_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body_of(text: &str) -> &str {
        let open = text.find('[').expect("test input has a bracket");
        extract_delimited(text, open, Delimiter::Bracket)
            .expect("bracket is balanced")
            .0
    }

    #[test]
    fn simple_method() {
        assert_eq!(body_of("value [\n    ^ value\n]"), "\n    ^ value\n");
    }

    #[test]
    fn nested_blocks() {
        assert_eq!(
            body_of("complexBlock [\n    ^ [ [ 1 + 2 ] value ] value\n]"),
            "\n    ^ [ [ 1 + 2 ] value ] value\n"
        );
    }

    #[test]
    fn bracket_inside_string() {
        assert_eq!(
            body_of("m [\n    ^ 'string with ] bracket'\n]"),
            "\n    ^ 'string with ] bracket'\n"
        );
    }

    #[test]
    fn bracket_inside_comment() {
        assert_eq!(
            body_of("m [\n    \"comment with ] bracket\"\n    ^ self\n]"),
            "\n    \"comment with ] bracket\"\n    ^ self\n"
        );
    }

    #[test]
    fn bracket_as_character_literal() {
        assert_eq!(body_of("m [\n    ^ $]\n]"), "\n    ^ $]\n");
    }

    #[test]
    fn dollar_quote_does_not_open_a_string() {
        // $' is a character literal; the following ] closes the body.
        assert_eq!(body_of("m [ ^ $' ]"), " ^ $' ");
    }

    #[test]
    fn doubled_quotes_stay_inside_the_string() {
        assert_eq!(body_of("m [ ^ 'it''s ] here' ]"), " ^ 'it''s ] here' ");
    }

    #[test]
    fn unbalanced_returns_none() {
        assert_eq!(find_matching("[ 'a ] b'", 0, Delimiter::Bracket), None);
        assert_eq!(find_matching("[ [ ] ", 0, Delimiter::Bracket), None);
    }

    #[test]
    fn braces_balance_for_ston_maps() {
        let text = "Class { #name : #C, #tag : 'has } inside' }";
        let open = text.find('{').unwrap();
        let (content, _) = extract_delimited(text, open, Delimiter::Brace).unwrap();
        assert_eq!(content, " #name : #C, #tag : 'has } inside' ");
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        let text = "[ 'héllo ] wörld' ]";
        let close = find_matching(text, 0, Delimiter::Bracket).unwrap();
        assert_eq!(&text[close..=close], "]");
        assert_eq!(close, text.len() - 1);
    }

    proptest! {
        /// Inserting `]` inside strings, comments, or as a character literal
        /// never fools the scanner.
        #[test]
        fn islands_are_opaque(
            prefix in "[a-z ]{0,10}",
            island in prop::sample::select(vec![
                "'has ] inside'",
                "\"has ] inside\"",
                "$]",
                "'it''s ] ok'",
                "\"quote \"\" and ] \"",
            ]),
            suffix in "[a-z ]{0,10}",
        ) {
            let text = format!("[{prefix}{island}{suffix}]");
            let close = find_matching(&text, 0, Delimiter::Bracket);
            prop_assert_eq!(close, Some(text.len() - 1));
        }

        /// Balanced nested brackets match at the outermost closer.
        #[test]
        fn nested_brackets_balance(depth in 1usize..8) {
            let text = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
            let close = find_matching(&text, 0, Delimiter::Bracket);
            prop_assert_eq!(close, Some(text.len() - 1));
        }
    }
}
