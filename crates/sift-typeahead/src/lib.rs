//! Typeahead suggestion engine for sift queries.
//!
//! Given a parsed [`sift_query::QueryList`] and a read-only registry of
//! field resolvers, [`suggest`] computes position-anchored completion
//! candidates for every `+key[:value]` filter in the query:
//!
//! - **Key suggestions** filter the registry by case-insensitive substring
//!   of the partial key, anchored at the key span with suffix `":"`.
//! - **Value suggestions** come from the resolver whose id matches the key
//!   exactly: a fixed list filtered locally, an asynchronous lookup, or a
//!   synthesized date option for date fields. Anchored at the value span
//!   with suffix `" "`.
//!
//! Fields resolve concurrently and share one [`CancellationToken`] per
//! call; the output is always in source order, and a failed or cancelled
//! lookup degrades that field to no suggestions instead of failing the
//! batch.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

#![warn(missing_docs)]

mod engine;
mod resolver;
mod suggestion;

pub use engine::suggest;
pub use resolver::{FieldResolver, LookupFn, ResolverError, ResolverRegistry, ResolverSource};
pub use suggestion::{
    DateOption, SuggestionOption, SuggestionType, TextOption, TypeaheadSuggestion,
};
