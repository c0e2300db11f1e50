//! Query abstract syntax tree.
//!
//! The tree is plain, acyclic, serializable data so it can cross a process
//! or rendering boundary unchanged. Every node is built fresh by a parse
//! call and immutable afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// The root of a parsed query: an ordered list of top-level expressions.
///
/// Empty when the input contained only whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryList {
    /// Top-level expressions in source order.
    pub content: Vec<QueryBinary>,
}

impl QueryList {
    /// Creates a query list from its top-level expressions.
    pub fn new(content: Vec<QueryBinary>) -> Self {
        Self { content }
    }

    /// The field expressions at the top level of the list, in source order.
    ///
    /// By construction fields only ever appear here, never nested in a
    /// group or on the right of an `AND`/`OR` chain.
    pub fn fields(&self) -> impl Iterator<Item = &QueryField> {
        self.content.iter().filter_map(|binary| match &binary.left {
            QueryContent::Field(field) => Some(field),
            _ => None,
        })
    }
}

impl fmt::Display for QueryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QueryList")?;
        for binary in &self.content {
            binary.fmt_tree(f, 1)?;
        }
        Ok(())
    }
}

/// A binary expression: content, optionally chained to another binary with
/// an `AND`/`OR` operator token.
///
/// Chains are right-associative and the two operators have no relative
/// precedence: `a AND b OR c` is `a AND (b OR c)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBinary {
    /// The left-hand content.
    pub left: QueryContent,
    /// The operator token and right-hand chain, when present.
    pub right: Option<(Token, Box<QueryBinary>)>,
}

impl QueryBinary {
    /// Creates an unchained binary from its content.
    pub fn new(left: QueryContent) -> Self {
        Self { left, right: None }
    }

    /// Creates a binary chained to a right-hand expression.
    pub fn chained(left: QueryContent, operator: Token, right: Self) -> Self {
        Self {
            left,
            right: Some((operator, Box::new(right))),
        }
    }

    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match &self.right {
            None => self.left.fmt_tree(f, indent),
            Some((operator, right)) => {
                writeln!(f, "{prefix}{}", operator.lexeme)?;
                self.left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }
}

/// The content of one side of a binary expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryContent {
    /// A bare or quoted search phrase.
    Str(QueryStr),

    /// A nested binary expression.
    Binary(Box<QueryBinary>),

    /// A parenthesised sub-expression.
    Group(QueryGroup),

    /// A `+key[:value]` filter. Only valid at the top level of the query.
    Field(QueryField),
}

impl QueryContent {
    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Str(s) => writeln!(f, "{prefix}Str({:?})", s.search_expr),
            Self::Binary(binary) => binary.fmt_tree(f, indent),
            Self::Group(group) => {
                writeln!(f, "{prefix}Group")?;
                group.content.fmt_tree(f, indent + 1)
            }
            Self::Field(field) => {
                let key = field.key.literal_or_empty();
                match &field.value {
                    Some(value) => {
                        writeln!(f, "{prefix}Field({:?}: {:?})", key, value.literal_or_empty())
                    }
                    None => writeln!(f, "{prefix}Field({key:?})"),
                }
            }
        }
    }
}

/// A parenthesised sub-expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroup {
    /// The expression between the brackets.
    pub content: Box<QueryBinary>,
}

/// A bare or quoted search phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStr {
    /// The phrase text, with any quotes stripped.
    pub search_expr: String,
    /// The token the phrase was parsed from, for positioning.
    pub token: Token,
}

impl QueryStr {
    /// Creates a phrase node from its token.
    pub fn from_token(token: Token) -> Self {
        Self {
            search_expr: token.literal_or_empty().to_string(),
            token,
        }
    }
}

/// A `+key[:value]` filter.
///
/// `value` is `None` until a value token is present in the source, even if
/// that token's literal is empty (`+tag:` has a value token with no
/// literal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryField {
    /// The `+key` token.
    pub key: Token,
    /// The `:value` token, when present.
    pub value: Option<Token>,
}

impl QueryField {
    /// The key text, without the leading `+`.
    pub fn key_literal(&self) -> &str {
        self.key.literal_or_empty()
    }

    /// The value text, without the leading `:`. `None` when there is no
    /// value token at all.
    pub fn value_literal(&self) -> Option<&str> {
        self.value.as_ref().map(Token::literal_or_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn str_content(text: &str, start: usize) -> QueryContent {
        QueryContent::Str(QueryStr::from_token(Token::new(
            TokenType::Str,
            text,
            Some(text.to_string()),
            start,
        )))
    }

    fn field(key: &str, start: usize) -> QueryField {
        QueryField {
            key: Token::new(
                TokenType::QueryFieldKey,
                format!("+{key}"),
                Some(key.to_string()),
                start,
            ),
            value: None,
        }
    }

    #[test]
    fn fields_iterates_top_level_fields_in_order() {
        let list = QueryList::new(vec![
            QueryBinary::new(str_content("marina", 0)),
            QueryBinary::new(QueryContent::Field(field("section", 7))),
            QueryBinary::new(QueryContent::Field(field("tag", 20))),
        ]);

        let keys: Vec<&str> = list.fields().map(QueryField::key_literal).collect();
        assert_eq!(keys, vec!["section", "tag"]);
    }

    #[test]
    fn display_renders_chain_as_tree() {
        let list = QueryList::new(vec![QueryBinary::chained(
            str_content("a", 0),
            Token::new(TokenType::Or, "OR", None, 2),
            QueryBinary::new(str_content("b", 5)),
        )]);

        let rendered = list.to_string();
        assert!(rendered.contains("OR"));
        assert!(rendered.contains("Str(\"a\")"));
        assert!(rendered.contains("Str(\"b\")"));
    }

    #[test]
    fn serializes_without_back_references() {
        let list = QueryList::new(vec![QueryBinary::new(QueryContent::Field(QueryField {
            key: Token::new(TokenType::QueryFieldKey, "+tag", Some("tag".into()), 0),
            value: Some(Token::new(TokenType::QueryValue, ":news", Some("news".into()), 4)),
        }))]);

        let json = serde_json::to_string(&list).unwrap();
        let back: QueryList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
