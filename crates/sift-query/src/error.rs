//! Error types for query parsing and serialization.
//!
//! Error messages are written for direct end-user display. Parse errors
//! carry the character offset of the offending token so the consumer can
//! annotate the query inline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parse error with position information.
///
/// Parsing is fail-fast: at most one of these is produced per parse call,
/// and no partial tree accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    /// Character offset of the token that triggered the error.
    pub position: usize,
    /// User-displayable message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Formats the error with a caret indicating where in the input it
    /// occurred.
    pub fn format_with_context(&self, input: &str) -> String {
        let clamped = self.position.min(input.chars().count());
        format!(
            "query syntax error: {}\n  {}\n  {}^",
            self.message,
            input,
            " ".repeat(clamped)
        )
    }
}

/// A serialization error.
///
/// Raised only when a field filter has no value: such a field cannot be
/// rendered into the downstream query string, and no partial output is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("the field '+{key}' needs a value after it to be included in a search query")]
pub struct SerializationError {
    /// The key of the field that was missing its value.
    pub key: String,
}

impl SerializationError {
    /// Creates a serialization error for the named field key.
    pub fn missing_value(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Any error a full query run can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum QueryError {
    /// The query failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The query parsed but could not be serialized.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl QueryError {
    /// The character offset associated with the error, where one exists.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.position),
            Self::Serialization(_) => None,
        }
    }
}
