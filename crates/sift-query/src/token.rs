//! Positioned lexical units.
//!
//! Tokens carry inclusive character offsets into the source text. Downstream
//! consumers (inline error annotation, suggestion anchoring) rely on these
//! offsets being exact, so they are computed in characters rather than bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    /// A bare or quoted search phrase.
    #[serde(rename = "STRING")]
    Str,

    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// Left parenthesis, opens a group.
    LeftBracket,

    /// Right parenthesis, closes a group.
    RightBracket,

    /// A field key introduced by `+` (e.g. `+section`).
    QueryFieldKey,

    /// A field value introduced by `:` (e.g. `:commentisfree`).
    QueryValue,

    /// Reserved; the scanner folds colons into [`Self::QueryValue`] tokens.
    Colon,

    /// Reserved; the scanner folds plus signs into [`Self::QueryFieldKey`] tokens.
    Plus,

    /// Reserved for numeric literals; never produced by the scanner.
    Number,

    /// Reserved for `@` handles; never produced by the scanner.
    At,

    /// End of input. Exactly one terminates every token stream.
    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::And => "AND",
            Self::Or => "OR",
            Self::LeftBracket => "'('",
            Self::RightBracket => "')'",
            Self::QueryFieldKey => "field key",
            Self::QueryValue => "field value",
            Self::Colon => "':'",
            Self::Plus => "'+'",
            Self::Number => "number",
            Self::At => "'@'",
            Self::Eof => "end of query",
        };
        write!(f, "{name}")
    }
}

/// A token in the query language.
///
/// `start` and `end` are inclusive character offsets. A zero-width token
/// (an empty lexeme, notably `Eof`) has `end == start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// The kind of token.
    pub token_type: TokenType,
    /// The raw source text of the token.
    pub lexeme: String,
    /// The decoded value, where it differs from the lexeme (quoted strings
    /// lose their quotes, field keys their `+`, values their `:`). `None`
    /// when there is no meaningful payload.
    pub literal: Option<String>,
    /// Inclusive character offset of the first character.
    pub start: usize,
    /// Inclusive character offset of the last character.
    pub end: usize,
}

impl Token {
    /// Creates a token, deriving `end` from the lexeme's character length.
    pub fn new(
        token_type: TokenType,
        lexeme: impl Into<String>,
        literal: Option<String>,
        start: usize,
    ) -> Self {
        let lexeme = lexeme.into();
        let chars = lexeme.chars().count();
        let end = if chars == 0 { start } else { start + chars - 1 };
        Self {
            token_type,
            lexeme,
            literal,
            start,
            end,
        }
    }

    /// Creates the end-of-input token at the given offset.
    pub fn eof(position: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            start: position,
            end: position,
        }
    }

    /// The literal text, or the empty string when there is none.
    pub fn literal_or_empty(&self) -> &str {
        self.literal.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} {:?} {}-{}",
            self.token_type, self.lexeme, self.literal, self.start, self.end
        )
    }
}
