//! Query-string serializer.
//!
//! Renders a parsed query into the flat `key=value&...` string the
//! downstream search API consumes. Free text is carried under the `q` key,
//! percent-encoded; field pairs are emitted unencoded, which is a quirk of
//! the downstream API contract rather than a recommendation.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    ast::{QueryBinary, QueryContent, QueryList},
    error::SerializationError,
};

/// Characters escaped in the `q` value.
///
/// Matches full URI component encoding: everything but alphanumerics and
/// `-_.!~*'()` is escaped, so spaces become `%20` and parentheses survive.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serializes a parsed query into the downstream query string.
///
/// Fails, with no partial output, if any field filter is missing its value.
pub fn to_search_query(list: &QueryList) -> Result<String, SerializationError> {
    let mut text_parts = Vec::new();
    let mut field_parts = Vec::new();

    for binary in &list.content {
        match &binary.left {
            QueryContent::Field(field) => {
                let value = field
                    .value_literal()
                    .ok_or_else(|| SerializationError::missing_value(field.key_literal()))?;
                field_parts.push(format!("{}={value}", field.key_literal()));
            }
            _ => text_parts.push(render_binary(binary)),
        }
    }

    let mut parts = Vec::new();

    let free_text = text_parts.join(" ").trim().to_string();
    if !free_text.is_empty() {
        parts.push(format!(
            "q={}",
            utf8_percent_encode(&free_text, QUERY_VALUE_SET)
        ));
    }

    parts.extend(field_parts);

    Ok(parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("&"))
}

/// Renders a binary chain, with literal operator keywords between sides.
fn render_binary(binary: &QueryBinary) -> String {
    let left = render_content(&binary.left);
    match &binary.right {
        None => left,
        Some((operator, right)) => {
            format!("{left} {} {}", operator.lexeme, render_binary(right))
        }
    }
}

/// Renders one side of a binary chain.
fn render_content(content: &QueryContent) -> String {
    match content {
        QueryContent::Str(s) => s.search_expr.clone(),
        QueryContent::Binary(binary) => render_binary(binary),
        QueryContent::Group(group) => format!("({})", render_binary(&group.content)),
        // Fields are only ever top-level list elements; they are handled
        // before rendering descends here.
        QueryContent::Field(field) => format!(
            "{}={}",
            field.key_literal(),
            field.value_literal().unwrap_or("")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse, scanner::scan};

    fn serialize(input: &str) -> Result<String, SerializationError> {
        to_search_query(&parse(scan(input)).unwrap())
    }

    #[test]
    fn empty_query_serializes_to_nothing() {
        assert_eq!(serialize("").unwrap(), "");
    }

    #[test]
    fn bare_terms() {
        assert_eq!(serialize("marina hyde").unwrap(), "q=marina%20hyde");
    }

    #[test]
    fn field_only() {
        assert_eq!(
            serialize("+section:commentisfree").unwrap(),
            "section=commentisfree"
        );
    }

    #[test]
    fn text_and_field() {
        assert_eq!(
            serialize("marina +section:commentisfree").unwrap(),
            "q=marina&section=commentisfree"
        );
    }

    #[test]
    fn quoted_phrase_with_operator_and_field() {
        assert_eq!(
            serialize("\"marina\" AND hyde +section:commentisfree").unwrap(),
            "q=marina%20AND%20hyde&section=commentisfree"
        );
    }

    #[test]
    fn group_with_operator_and_field() {
        assert_eq!(
            serialize("(hyde OR abramovic) +section:commentisfree").unwrap(),
            "q=(hyde%20OR%20abramovic)&section=commentisfree"
        );
    }

    #[test]
    fn multiple_fields_in_source_order() {
        assert_eq!(
            serialize("+section:sport +tag:football").unwrap(),
            "section=sport&tag=football"
        );
    }

    #[test]
    fn field_values_are_not_encoded() {
        // Carried-over downstream quirk: only the q value is encoded.
        assert_eq!(
            serialize("+path:foo/bar baz").unwrap(),
            "q=baz&path=foo/bar"
        );
    }

    #[test]
    fn field_with_empty_value_token_serializes_empty() {
        assert_eq!(serialize("+tag:").unwrap(), "tag=");
    }

    #[test]
    fn field_without_value_fails_naming_the_key() {
        let err = serialize("+tag").unwrap_err();
        assert_eq!(err.key, "tag");

        let err = serialize("marina +tag").unwrap_err();
        assert_eq!(err.key, "tag");
    }

    #[test]
    fn nested_groups_render_nested_brackets() {
        assert_eq!(
            serialize("(a OR (b AND c))").unwrap(),
            "q=(a%20OR%20(b%20AND%20c))"
        );
    }

    #[test]
    fn free_text_is_trimmed_and_single_spaced() {
        assert_eq!(serialize("  marina hyde  ").unwrap(), "q=marina%20hyde");
    }
}
