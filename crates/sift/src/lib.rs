//! Query engine facade.
//!
//! Orchestrates the full pipeline over a query string: scan, parse, then
//! typeahead suggestion and search-query serialization, merged into one
//! [`ResultEnvelope`] for the consumer (typically a query editor).
//!
//! Scanning always succeeds. A parse failure short-circuits: the envelope
//! carries the tokens and the error, nothing else. On a successful parse
//! both suggestions and the serialized query are computed; a serialization
//! failure still leaves the tokens, tree, and suggestions in place.
//!
//! # Example
//!
//! ```
//! use sift::run;
//! use sift_typeahead::ResolverRegistry;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = ResolverRegistry::default();
//! let envelope = run("marina +section:sport", &registry, &CancellationToken::new()).await;
//! assert_eq!(envelope.query_result.as_deref(), Some("q=marina&section=sport"));
//! # }
//! ```

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use sift_query::{QueryError, QueryList, Token, parse, scan, to_search_query};
use sift_typeahead::{ResolverRegistry, TypeaheadSuggestion, suggest};
use tokio_util::sync::CancellationToken;

/// Everything one engine run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// The scanned tokens. Always present; scanning is total.
    pub tokens: Vec<Token>,
    /// The parsed tree, absent when parsing failed.
    pub ast: Option<QueryList>,
    /// Typeahead suggestions, empty when parsing failed.
    pub suggestions: Vec<TypeaheadSuggestion>,
    /// The serialized search query, absent on any error.
    pub query_result: Option<String>,
    /// The parse or serialization error, if one occurred.
    pub error: Option<QueryError>,
}

/// Runs the full engine over a query string.
///
/// The cancellation token is threaded into every value lookup performed
/// during this call. A caller superseding this run with a newer one should
/// cancel this token so stale suggestion work stops early.
pub async fn run(
    text: &str,
    registry: &ResolverRegistry,
    cancel: &CancellationToken,
) -> ResultEnvelope {
    let tokens = scan(text);

    let ast = match parse(tokens.clone()) {
        Ok(ast) => ast,
        Err(error) => {
            return ResultEnvelope {
                tokens,
                ast: None,
                suggestions: Vec::new(),
                query_result: None,
                error: Some(error.into()),
            };
        }
    };

    let suggestions = suggest(&ast, registry, cancel).await;

    match to_search_query(&ast) {
        Ok(query_result) => ResultEnvelope {
            tokens,
            ast: Some(ast),
            suggestions,
            query_result: Some(query_result),
            error: None,
        },
        Err(error) => ResultEnvelope {
            tokens,
            ast: Some(ast),
            suggestions,
            query_result: None,
            error: Some(error.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use sift_query::TokenType;

    use super::*;

    async fn run_plain(text: &str) -> ResultEnvelope {
        run(text, &ResolverRegistry::default(), &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn successful_run_fills_everything() {
        let envelope = run_plain("marina +section:sport").await;
        assert!(envelope.ast.is_some());
        assert_eq!(
            envelope.query_result.as_deref(),
            Some("q=marina&section=sport")
        );
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn parse_failure_keeps_tokens_only() {
        let envelope = run_plain("marina AND").await;
        assert!(envelope.ast.is_none());
        assert!(envelope.suggestions.is_empty());
        assert!(envelope.query_result.is_none());
        assert!(matches!(envelope.error, Some(QueryError::Parse(_))));
        assert_eq!(
            envelope.tokens.last().unwrap().token_type,
            TokenType::Eof
        );
    }

    #[tokio::test]
    async fn serialization_failure_keeps_tokens_ast_and_suggestions() {
        let envelope = run_plain("marina +tag").await;
        assert!(envelope.ast.is_some());
        assert!(envelope.query_result.is_none());
        assert!(matches!(
            envelope.error,
            Some(QueryError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn empty_input_is_a_successful_empty_run() {
        let envelope = run_plain("").await;
        assert_eq!(envelope.ast, Some(QueryList::new(vec![])));
        assert_eq!(envelope.query_result.as_deref(), Some(""));
        assert!(envelope.error.is_none());
    }
}
