//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent with one
//! token of lookahead.
//!
//! # Grammar
//!
//! ```text
//! query_list   → query* EOF
//! query        → query_field | query_binary
//! query_binary → query_content ((AND | OR) query_binary)?
//! query_content→ query_group | STR
//! query_group  → "(" query_binary ")"
//! query_field  → QUERY_FIELD_KEY QUERY_VALUE?
//! ```
//!
//! `AND`/`OR` chains are right-associative with no relative precedence.
//! Field filters are only valid as top-level list elements; the parser
//! rejects them after a binary operator or inside a group.
//!
//! Parsing is fail-fast: the first violation aborts the call with a single
//! positioned [`ParseError`] and no partial tree.

use crate::{
    ast::{QueryBinary, QueryContent, QueryField, QueryGroup, QueryList, QueryStr},
    error::ParseError,
    token::{Token, TokenType},
};

/// Where the expression being parsed sits, for field-placement errors.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// A top-level list element.
    TopLevel,
    /// The right-hand side of the named binary operator.
    AfterOperator(String),
    /// Inside a parenthesised group.
    InGroup,
}

/// Recursive descent parser for query token streams.
struct Parser {
    /// Token stream to parse, terminated by `Eof`.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses: query_list → query* EOF
    fn parse_query_list(mut self) -> Result<QueryList, ParseError> {
        let mut content = Vec::new();

        while self.peek().token_type != TokenType::Eof {
            content.push(self.parse_query()?);
        }

        Ok(QueryList::new(content))
    }

    /// Parses one top-level list element.
    ///
    /// A field filter is parsed on its own and never chains into a binary
    /// expression, which keeps fields at the top level of the list.
    fn parse_query(&mut self) -> Result<QueryBinary, ParseError> {
        if self.peek().token_type == TokenType::QueryFieldKey {
            let field = self.parse_field()?;
            return Ok(QueryBinary::new(QueryContent::Field(field)));
        }

        self.parse_binary(&Placement::TopLevel)
    }

    /// Parses: query_binary → query_content ((AND | OR) query_binary)?
    fn parse_binary(&mut self, placement: &Placement) -> Result<QueryBinary, ParseError> {
        let left = self.parse_content(placement)?;

        if !matches!(
            self.peek().token_type,
            TokenType::And | TokenType::Or
        ) {
            return Ok(QueryBinary::new(left));
        }

        let operator = self.advance().clone();
        let right = self.parse_binary(&Placement::AfterOperator(operator.lexeme.clone()))?;
        Ok(QueryBinary::chained(left, operator, right))
    }

    /// Parses: query_content → query_group | STR
    fn parse_content(&mut self, placement: &Placement) -> Result<QueryContent, ParseError> {
        let token = self.peek().clone();

        match token.token_type {
            TokenType::Str => {
                self.advance();
                Ok(QueryContent::Str(QueryStr::from_token(token)))
            }

            TokenType::LeftBracket => Ok(QueryContent::Group(self.parse_group()?)),

            TokenType::QueryFieldKey => match placement {
                // Unreachable from parse_query, which handles top-level
                // fields before descending into a binary.
                Placement::TopLevel => Ok(QueryContent::Field(self.parse_field()?)),
                Placement::AfterOperator(operator) => Err(self.error_at(
                    &token,
                    format!(
                        "the field '{}' cannot follow '{operator}'; fields must appear at the top level of the query",
                        token.lexeme
                    ),
                )),
                Placement::InGroup => Err(self.error_at(
                    &token,
                    format!(
                        "the field '{}' cannot appear inside a group; fields must appear at the top level of the query",
                        token.lexeme
                    ),
                )),
            },

            TokenType::QueryValue | TokenType::Colon => Err(self.error_at(
                &token,
                "unexpected ':' - a field value must follow a field key, e.g. +section:sport",
            )),

            TokenType::And | TokenType::Or => Err(self.error_at(
                &token,
                format!(
                    "'{}' must have a search term before and after it",
                    token.lexeme
                ),
            )),

            TokenType::Eof => match placement {
                Placement::AfterOperator(operator) => Err(self.error_at(
                    &token,
                    format!("'{operator}' must have a search term before and after it"),
                )),
                _ => Err(self.error_at(&token, "unexpected end of query")),
            },

            _ => Err(self.error_at(
                &token,
                format!("unexpected {} in query", token.token_type),
            )),
        }
    }

    /// Parses: query_group → "(" query_binary ")"
    fn parse_group(&mut self) -> Result<QueryGroup, ParseError> {
        self.advance(); // consume (

        let next = self.peek().clone();
        match next.token_type {
            TokenType::RightBracket => {
                return Err(self.error_at(
                    &next,
                    "groups must contain some content, e.g. (sausages OR mash)",
                ));
            }
            TokenType::Eof => {
                return Err(self.error_at(&next, "a group must end with a right bracket ')'"));
            }
            _ => {}
        }

        let content = self.parse_binary(&Placement::InGroup)?;

        let closing = self.peek().clone();
        if closing.token_type != TokenType::RightBracket {
            return Err(self.error_at(&closing, "a group must end with a right bracket ')'"));
        }
        self.advance(); // consume )

        Ok(QueryGroup {
            content: Box::new(content),
        })
    }

    /// Parses: query_field → QUERY_FIELD_KEY QUERY_VALUE?
    fn parse_field(&mut self) -> Result<QueryField, ParseError> {
        let key = self.advance().clone();

        let value = match self.peek().token_type {
            TokenType::QueryValue => Some(self.advance().clone()),
            TokenType::Colon => {
                let colon = self.peek().clone();
                return Err(self.error_at(
                    &colon,
                    format!(
                        "expected a value after the ':' in the field '{}'",
                        key.lexeme
                    ),
                ));
            }
            _ => None,
        };

        Ok(QueryField { key, value })
    }

    /// Creates a parse error anchored at the given token's start offset.
    fn error_at(&self, token: &Token, message: impl Into<String>) -> ParseError {
        ParseError::new(token.start, message)
    }

    /// Returns the current token without consuming it.
    ///
    /// The stream always ends in `Eof`, so a current token always exists.
    fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Consumes and returns the current token, never moving past `Eof`.
    fn advance(&mut self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        &self.tokens[index]
    }
}

/// Parses a token stream into a query AST.
///
/// Returns an empty [`QueryList`] for an input of only whitespace, and a
/// single positioned [`ParseError`] for the first grammar violation.
pub fn parse(mut tokens: Vec<Token>) -> Result<QueryList, ParseError> {
    // A stream from the scanner always ends in Eof; tolerate its absence.
    if tokens.last().map(|token| token.token_type) != Some(TokenType::Eof) {
        let position = tokens.last().map_or(0, |token| token.end + 1);
        tokens.push(Token::eof(position));
    }
    Parser::new(tokens).parse_query_list()
}
