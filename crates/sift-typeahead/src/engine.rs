//! The typeahead suggestion engine.
//!
//! Walks the top-level field filters of a parsed query and computes
//! position-anchored suggestions for each key and value span. Fields are
//! resolved concurrently, but the output is ordered by source position:
//! resolver completion order never affects the result.

use futures::future::join_all;
use sift_query::{QueryField, QueryList, Token};
use tokio_util::sync::CancellationToken;

use crate::{
    resolver::{FieldResolver, ResolverRegistry, ResolverSource},
    suggestion::{DateOption, SuggestionOption, SuggestionType, TextOption, TypeaheadSuggestion},
};

/// Suffix spliced in after an accepted key suggestion.
const KEY_SUFFIX: &str = ":";
/// Suffix spliced in after an accepted value suggestion.
const VALUE_SUFFIX: &str = " ";

/// Computes typeahead suggestions for every field filter in the query.
///
/// Each field's suggestions are computed independently and concurrently;
/// the returned list concatenates each field's key-then-value suggestions
/// in source order. A failed or cancelled value lookup degrades to no
/// suggestions for that field rather than failing the batch.
pub async fn suggest(
    list: &QueryList,
    registry: &ResolverRegistry,
    cancel: &CancellationToken,
) -> Vec<TypeaheadSuggestion> {
    let per_field = list
        .fields()
        .map(|field| suggest_field(field, registry, cancel.clone()));

    join_all(per_field).await.into_iter().flatten().collect()
}

/// Computes the key and value suggestions for a single field.
async fn suggest_field(
    field: &QueryField,
    registry: &ResolverRegistry,
    cancel: CancellationToken,
) -> Vec<TypeaheadSuggestion> {
    let mut suggestions = Vec::new();

    if let Some(keys) = key_suggestions(field, registry) {
        suggestions.push(keys);
    }

    if let Some(value) = &field.value {
        if let Some(values) = value_suggestions(field, value, registry, cancel).await {
            suggestions.push(values);
        }
    }

    suggestions
}

/// Suggests field keys matching the partial key, anchored at the key span.
///
/// An empty partial offers the whole registry in registration order; no
/// matches offers nothing.
fn key_suggestions(
    field: &QueryField,
    registry: &ResolverRegistry,
) -> Option<TypeaheadSuggestion> {
    let options: Vec<SuggestionOption> = registry
        .matching(field.key_literal())
        .map(|resolver| SuggestionOption::Text(resolver.as_text_option()))
        .collect();

    if options.is_empty() {
        return None;
    }

    Some(TypeaheadSuggestion {
        from: field.key.start,
        to: field.key.end,
        suggestion_type: SuggestionType::Text,
        suffix: KEY_SUFFIX.to_string(),
        suggestions: options,
    })
}

/// Suggests values for the field's resolver, anchored at the value span.
///
/// Produces nothing when no resolver matches the key exactly, when the
/// source offers no candidates, or when a lookup fails or is cancelled.
async fn value_suggestions(
    field: &QueryField,
    value: &Token,
    registry: &ResolverRegistry,
    cancel: CancellationToken,
) -> Option<TypeaheadSuggestion> {
    let resolver = registry.by_id(field.key_literal())?;

    let options = match resolver.suggestion_type {
        SuggestionType::Date => vec![SuggestionOption::Date(DateOption::default())],
        SuggestionType::Text => resolve_text_options(resolver, value.literal_or_empty(), cancel)
            .await?
            .into_iter()
            .map(SuggestionOption::Text)
            .collect(),
    };

    if options.is_empty() {
        return None;
    }

    Some(TypeaheadSuggestion {
        from: value.start,
        to: value.end,
        suggestion_type: resolver.suggestion_type,
        suffix: VALUE_SUFFIX.to_string(),
        suggestions: options,
    })
}

/// Resolves text candidates from the resolver's source.
async fn resolve_text_options(
    resolver: &FieldResolver,
    partial: &str,
    cancel: CancellationToken,
) -> Option<Vec<TextOption>> {
    match &resolver.source {
        ResolverSource::Static(options) => {
            let needle = partial.to_lowercase();
            Some(
                options
                    .iter()
                    .filter(|option| option.label.to_lowercase().contains(&needle))
                    .cloned()
                    .collect(),
            )
        }
        ResolverSource::Lookup(lookup) => {
            match lookup(partial.to_string(), cancel).await {
                Ok(options) => Some(options),
                Err(err) => {
                    // Degrade to no suggestions for this field only.
                    tracing::debug!(field = %resolver.id, error = %err, "value lookup failed");
                    None
                }
            }
        }
    }
}
