//! Field resolvers: pluggable suggestion sources for field values.
//!
//! A registry of resolvers is built once by the integration layer and
//! passed into the engine read-only. Registration order is presentation
//! order for key suggestions.

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::suggestion::{SuggestionType, TextOption};

/// A failed or cancelled value lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// The lookup function failed.
    #[error("lookup for field '{field}' failed: {message}")]
    Lookup {
        /// The field id the lookup was resolving.
        field: String,
        /// What went wrong.
        message: String,
    },

    /// The lookup observed its cancellation token and stopped early.
    #[error("lookup was cancelled")]
    Cancelled,
}

/// An asynchronous value lookup.
///
/// Called with the partial value typed so far and the cancellation token
/// for the current run; expected to stop early when the token is cancelled.
pub type LookupFn = Arc<
    dyn Fn(String, CancellationToken) -> BoxFuture<'static, Result<Vec<TextOption>, ResolverError>>
        + Send
        + Sync,
>;

/// Where a resolver's value suggestions come from.
#[derive(Clone)]
pub enum ResolverSource {
    /// A fixed list, filtered locally by the engine.
    Static(Vec<TextOption>),
    /// An asynchronous lookup, typically backed by a network call.
    Lookup(LookupFn),
}

impl fmt::Debug for ResolverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(options) => write!(f, "Static({} options)", options.len()),
            Self::Lookup(_) => write!(f, "Lookup"),
        }
    }
}

/// A suggestion source for one field id.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    /// The field key this resolver answers for (exact match).
    pub id: String,
    /// Human-readable name shown in key suggestions.
    pub display_name: String,
    /// Longer description shown alongside the name.
    pub description: String,
    /// The kind of value this field accepts.
    pub suggestion_type: SuggestionType,
    /// Where value suggestions come from. Unused for date fields.
    pub source: ResolverSource,
}

impl FieldResolver {
    /// Creates a text resolver backed by a fixed option list.
    pub fn fixed(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        options: Vec<TextOption>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            suggestion_type: SuggestionType::Text,
            source: ResolverSource::Static(options),
        }
    }

    /// Creates a text resolver backed by an asynchronous lookup.
    pub fn lookup(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        lookup: LookupFn,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            suggestion_type: SuggestionType::Text,
            source: ResolverSource::Lookup(lookup),
        }
    }

    /// Creates a date resolver. Values come from the consumer's date
    /// picker, so there is no suggestion source to call.
    pub fn date(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            suggestion_type: SuggestionType::Date,
            source: ResolverSource::Static(Vec::new()),
        }
    }

    /// The key suggestion presenting this resolver.
    pub fn as_text_option(&self) -> TextOption {
        TextOption::new(self.display_name.clone(), self.id.clone())
            .with_description(self.description.clone())
    }
}

/// An ordered, read-only collection of field resolvers.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
    /// Resolvers in registration order.
    resolvers: Vec<FieldResolver>,
}

impl ResolverRegistry {
    /// Creates a registry from resolvers in registration order.
    pub fn new(resolvers: Vec<FieldResolver>) -> Self {
        Self { resolvers }
    }

    /// All resolvers, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldResolver> {
        self.resolvers.iter()
    }

    /// Resolvers whose id contains `partial` as a case-insensitive
    /// substring, in registration order.
    pub fn matching(&self, partial: &str) -> impl Iterator<Item = &FieldResolver> {
        let needle = partial.to_lowercase();
        self.resolvers
            .iter()
            .filter(move |resolver| resolver.id.to_lowercase().contains(&needle))
    }

    /// The resolver whose id equals `id` exactly, if any.
    pub fn by_id(&self, id: &str) -> Option<&FieldResolver> {
        self.resolvers.iter().find(|resolver| resolver.id == id)
    }

    /// True when no resolvers are registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// The number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }
}
