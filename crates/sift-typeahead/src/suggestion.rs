//! Typeahead suggestion types.
//!
//! Suggestions are anchored to the token span they would replace, and carry
//! the suffix to splice in after the span if accepted (`":"` after a key,
//! `" "` after a value). Like the AST, they are plain serializable data.

use serde::{Deserialize, Serialize};

/// The kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SuggestionType {
    /// Free-text values, suggested from a resolver.
    Text,
    /// Date values, picked by the consumer rather than resolved.
    Date,
}

/// A single text completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOption {
    /// Human-readable label.
    pub label: String,
    /// The value spliced into the query when accepted.
    pub value: String,
    /// Optional longer description for display alongside the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TextOption {
    /// Creates an option whose label and value differ.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    /// Creates an option whose label doubles as its value.
    pub fn plain(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A date completion candidate: an optional validity window for the
/// consumer's date picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOption {
    /// Earliest acceptable date, ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// Latest acceptable date, ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
}

/// One completion candidate of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionOption {
    /// A text candidate.
    Text(TextOption),
    /// A date candidate.
    Date(DateOption),
}

/// A position-anchored set of completion candidates for a key or value span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeaheadSuggestion {
    /// Inclusive character offset of the first character of the span.
    pub from: usize,
    /// Inclusive character offset of the last character of the span.
    pub to: usize,
    /// The kind of suggestions offered.
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    /// Text spliced in immediately after the span when a candidate is
    /// accepted.
    pub suffix: String,
    /// Candidates in presentation order.
    pub suggestions: Vec<SuggestionOption>,
}
