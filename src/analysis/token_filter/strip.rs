//! Strip filter implementation.
//!
//! Removes leading and trailing non-word characters (quotes, brackets,
//! sentence punctuation) and a trailing possessive `'s`, so `"Dog's,` and
//! `dog` count as the same word.

use std::sync::LazyLock;

use regex::Regex;

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\W+|\W+$").expect("valid edge punctuation pattern"));

static POSSESSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'s$").expect("valid possessive pattern"));

/// A filter that trims punctuation from word edges.
///
/// Tokens that become empty are marked as stopped.
#[derive(Clone, Debug, Default)]
pub struct StripFilter;

impl StripFilter {
    /// Create a new strip filter.
    pub fn new() -> Self {
        StripFilter
    }

    /// Strip a single word.
    pub fn strip(word: &str) -> String {
        let trimmed = EDGE_PUNCTUATION.replace_all(word, "");
        POSSESSIVE.replace(&trimmed, "").into_owned()
    }
}

impl Filter for StripFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            if token.is_stopped() {
                return token;
            }
            let stripped = Self::strip(&token.text);
            if stripped.is_empty() {
                token.with_text(stripped).stop()
            } else {
                token.with_text(stripped)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "strip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_strip_word() {
        assert_eq!(StripFilter::strip("\"hello,"), "hello");
        assert_eq!(StripFilter::strip("(world)."), "world");
        assert_eq!(StripFilter::strip("dog's"), "dog");
        assert_eq!(StripFilter::strip("it's."), "it");
        assert_eq!(StripFilter::strip("don't"), "don't");
        assert_eq!(StripFilter::strip("--"), "");
    }

    #[test]
    fn test_strip_filter() {
        let filter = StripFilter::new();
        let tokens = vec![
            Token::new("hello!", 0),
            Token::new("world", 1),
            Token::new("...", 2),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "world");
        assert!(result[2].is_stopped());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StripFilter::new().name(), "strip");
    }
}
