//! Query scanner (tokenizer).
//!
//! Converts a query string into a stream of positioned tokens. Scanning is
//! total: any input produces a token stream ending in a single `Eof` token,
//! and a malformed quoted string degrades to a best-effort `Str` token with
//! a diagnostic log rather than an error.

use crate::token::{Token, TokenType};

/// Tokenizes a query string.
struct Scanner {
    /// The input as characters, so offsets are character offsets.
    chars: Vec<char>,
    /// Current character position in the input.
    position: usize,
    /// Tokens produced so far.
    tokens: Vec<Token>,
}

impl Scanner {
    /// Creates a new scanner for the given input.
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Scans the entire input.
    fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.chars.len()));
        self.tokens
    }

    /// Scans a single token starting at the current position.
    fn scan_token(&mut self) {
        let start = self.position;
        let ch = self.advance();

        match ch {
            ' ' => {} // separator, not part of any lexeme
            '(' => self.add_token(TokenType::LeftBracket, start, None),
            ')' => self.add_token(TokenType::RightBracket, start, None),
            '+' => self.scan_key(start),
            ':' => self.scan_value(start),
            '"' => self.scan_quoted_string(start),
            c if c.is_alphanumeric() => self.scan_word(start),
            _ => self.scan_string(start),
        }
    }

    /// Scans a field key: `+` followed by characters up to a colon,
    /// whitespace, or end of input.
    fn scan_key(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if ch == ':' || ch.is_whitespace() {
                break;
            }
            self.advance();
        }

        let literal = self.text_from(start + 1);
        self.add_token(TokenType::QueryFieldKey, start, literal);
    }

    /// Scans a field value: `:` followed by non-whitespace characters.
    fn scan_value(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                break;
            }
            self.advance();
        }

        let literal = self.text_from(start + 1);
        self.add_token(TokenType::QueryValue, start, literal);
    }

    /// Scans a quoted string. The literal is the inner text with the quotes
    /// stripped. An unterminated quote logs and emits what was scanned.
    fn scan_quoted_string(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if ch == '"' {
                break;
            }
            self.advance();
        }

        if self.is_at_end() {
            tracing::warn!(position = start, "unterminated quoted string in query");
            let literal = self.text_from(start + 1);
            self.add_token(TokenType::Str, start, literal);
            return;
        }

        let literal = self.text_from(start + 1);
        self.advance(); // consume closing quote
        self.add_token(TokenType::Str, start, literal);
    }

    /// Scans a run of letters and digits, emitting a reserved keyword token
    /// if the run is exactly `AND` or `OR`, and otherwise continuing as an
    /// unquoted string from the same starting position.
    fn scan_word(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if !ch.is_alphanumeric() {
                break;
            }
            self.advance();
        }

        let word: String = self.chars[start..self.position].iter().collect();
        match word.as_str() {
            "AND" => self.add_token(TokenType::And, start, None),
            "OR" => self.add_token(TokenType::Or, start, None),
            _ => self.scan_string(start),
        }
    }

    /// Scans an unquoted string.
    ///
    /// The run absorbs interior whitespace but stops one character short of
    /// the final whitespace character before the next non-whitespace
    /// character, leaving that separator for the main loop to skip. It also
    /// stops before `)` and at end of input.
    fn scan_string(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if ch == ')' {
                break;
            }
            if ch.is_whitespace() && !self.peek_next().is_some_and(char::is_whitespace) {
                break;
            }
            self.advance();
        }

        let literal = self.text_from(start);
        self.add_token(TokenType::Str, start, literal);
    }

    /// Returns the text from the given position to the current position,
    /// or `None` if that range is empty.
    fn text_from(&self, from: usize) -> Option<String> {
        if from >= self.position {
            None
        } else {
            Some(self.chars[from..self.position].iter().collect())
        }
    }

    /// Emits a token whose lexeme spans from `start` to the current position.
    fn add_token(&mut self, token_type: TokenType, start: usize, literal: Option<String>) {
        let lexeme: String = self.chars[start..self.position].iter().collect();
        self.tokens.push(Token::new(token_type, lexeme, literal, start));
    }

    /// Returns the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Returns the character after the current one without consuming it.
    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Consumes and returns the current character.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        ch
    }

    /// True once the whole input has been consumed.
    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }
}

/// Tokenizes a query string.
///
/// Always succeeds; the returned stream is terminated by exactly one `Eof`
/// token positioned at the input's character length.
pub fn scan(input: &str) -> Vec<Token> {
    Scanner::new(input).scan_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn empty_input() {
        let tokens = scan("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], Token::eof(0));
    }

    #[test]
    fn whitespace_only() {
        let tokens = scan("   ");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], Token::eof(3));
    }

    #[test]
    fn single_term() {
        let tokens = scan("hyde");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Str, "hyde", Some("hyde".into()), 0),
                Token::eof(4),
            ]
        );
    }

    #[test]
    fn single_space_separates_terms() {
        let tokens = scan("marina hyde");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Str, "marina", Some("marina".into()), 0),
                Token::new(TokenType::Str, "hyde", Some("hyde".into()), 7),
                Token::eof(11),
            ]
        );
    }

    #[test]
    fn double_space_is_absorbed_except_the_last() {
        let tokens = scan("marina  hyde");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Str, "marina ", Some("marina ".into()), 0),
                Token::new(TokenType::Str, "hyde", Some("hyde".into()), 8),
                Token::eof(12),
            ]
        );
    }

    #[test]
    fn trailing_whitespace_is_dropped() {
        let tokens = scan("hyde ");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Str, "hyde", Some("hyde".into()), 0),
                Token::eof(5),
            ]
        );
    }

    #[test]
    fn reserved_words() {
        let tokens = scan("marina AND hyde");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Str,
                TokenType::And,
                TokenType::Str,
                TokenType::Eof
            ]
        );
        assert_eq!(tokens[1].lexeme, "AND");
        assert_eq!((tokens[1].start, tokens[1].end), (7, 9));
    }

    #[test]
    fn reserved_words_are_case_sensitive() {
        let tokens = scan("marina and hyde");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Str,
                TokenType::Str,
                TokenType::Str,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn reserved_word_requires_whole_run() {
        let tokens = scan("ORCOMBE");
        assert_eq!(types(&tokens), vec![TokenType::Str, TokenType::Eof]);
        assert_eq!(tokens[0].lexeme, "ORCOMBE");
    }

    #[test]
    fn or_keyword() {
        let tokens = scan("hyde OR abramovic");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Str,
                TokenType::Or,
                TokenType::Str,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn brackets() {
        let tokens = scan("(hyde)");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::LeftBracket, "(", None, 0),
                Token::new(TokenType::Str, "hyde", Some("hyde".into()), 1),
                Token::new(TokenType::RightBracket, ")", None, 5),
                Token::eof(6),
            ]
        );
    }

    #[test]
    fn quoted_string_strips_quotes() {
        let tokens = scan("\"marina hyde\"");
        assert_eq!(
            tokens,
            vec![
                Token::new(
                    TokenType::Str,
                    "\"marina hyde\"",
                    Some("marina hyde".into()),
                    0
                ),
                Token::eof(13),
            ]
        );
    }

    #[test]
    fn unterminated_quote_degrades_to_string() {
        let tokens = scan("\"marina");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Str, "\"marina", Some("marina".into()), 0),
                Token::eof(7),
            ]
        );
    }

    #[test]
    fn field_key_with_value() {
        let tokens = scan("+section:commentisfree");
        assert_eq!(
            tokens,
            vec![
                Token::new(
                    TokenType::QueryFieldKey,
                    "+section",
                    Some("section".into()),
                    0
                ),
                Token::new(
                    TokenType::QueryValue,
                    ":commentisfree",
                    Some("commentisfree".into()),
                    8
                ),
                Token::eof(22),
            ]
        );
    }

    #[test]
    fn bare_plus_has_no_literal() {
        let tokens = scan("+");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::QueryFieldKey, "+", None, 0),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn key_with_empty_value() {
        // The worked example from the language definition: "+tag:"
        let tokens = scan("+tag:");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::QueryFieldKey, "+tag", Some("tag".into()), 0),
                Token::new(TokenType::QueryValue, ":", None, 4),
                Token::eof(5),
            ]
        );
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[1].start, tokens[1].end), (4, 4));
        assert_eq!((tokens[2].start, tokens[2].end), (5, 5));
    }

    #[test]
    fn key_stops_at_whitespace() {
        let tokens = scan("+tag hyde");
        assert_eq!(
            types(&tokens),
            vec![TokenType::QueryFieldKey, TokenType::Str, TokenType::Eof]
        );
        assert_eq!(tokens[0].literal, Some("tag".into()));
    }

    #[test]
    fn string_stops_before_right_bracket() {
        let tokens = scan("(hyde OR abramovic) next");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::LeftBracket,
                TokenType::Str,
                TokenType::Or,
                TokenType::Str,
                TokenType::RightBracket,
                TokenType::Str,
                TokenType::Eof,
            ]
        );
        assert_eq!(tokens[3].lexeme, "abramovic");
    }

    #[test]
    fn punctuation_joins_a_string_run() {
        let tokens = scan("commentisfree/commentisfree");
        assert_eq!(types(&tokens), vec![TokenType::Str, TokenType::Eof]);
        assert_eq!(tokens[0].lexeme, "commentisfree/commentisfree");
    }

    #[test]
    fn offsets_are_character_offsets() {
        let tokens = scan("café hyde");
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[1].start, tokens[1].end), (5, 8));
        assert_eq!(tokens[2], Token::eof(9));
    }

    #[test]
    fn eof_is_always_last_and_unique() {
        for input in ["", "a", "a AND b", "+k:v", "\"unterminated", "(((", ":::"] {
            let tokens = scan(input);
            let eofs = tokens
                .iter()
                .filter(|t| t.token_type == TokenType::Eof)
                .count();
            assert_eq!(eofs, 1, "input {input:?}");
            assert_eq!(
                tokens.last().unwrap().token_type,
                TokenType::Eof,
                "input {input:?}"
            );
        }
    }
}
