//! Stop filter implementation.
//!
//! Marks words from a user-supplied stoplist as stopped. The stoplist is
//! compared against tokens after every earlier pipeline stage has run, so
//! the words in it must already be in cleaned form (see
//! [`TextCleaner`](crate::analysis::analyzer::cleaner::TextCleaner), which
//! cleans the list before building this filter).
//!
//! # Examples
//!
//! ```
//! use genre_rank::analysis::token_filter::Filter;
//! use genre_rank::analysis::token_filter::stop::StopFilter;
//! use genre_rank::analysis::token::Token;
//!
//! let filter = StopFilter::from_words(vec!["the"]);
//! let tokens = vec![Token::new("the", 0), Token::new("quick", 1)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert!(result[0].is_stopped());
//! assert!(!result[1].is_stopped());
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that stops stoplisted words.
#[derive(Clone, Debug, Default)]
pub struct StopFilter {
    /// The set of stop words
    stop_words: Arc<HashSet<String>>,
    /// Whether to drop stopped tokens instead of marking them
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a stop filter with no stop words.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stop filter from a set of words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
            remove_stopped: false,
        }
    }

    /// Create a stop filter from a list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_stop_words(words.into_iter().map(Into::into).collect())
    }

    /// Drop stopped tokens from the stream instead of marking them.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        if self.stop_words.is_empty() {
            return Ok(tokens);
        }

        let filtered_tokens: Vec<Token> = tokens
            .filter_map(|token| {
                if token.is_stopped() || !self.is_stop_word(&token.text) {
                    Some(token)
                } else if self.remove_stopped {
                    None
                } else {
                    Some(token.stop())
                }
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_filter_marks() {
        let filter = StopFilter::from_words(vec!["the", "and", "or"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
            Token::new("and", 3),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 4);
        assert!(!result[0].is_stopped());
        assert!(result[1].is_stopped());
        assert!(!result[2].is_stopped());
        assert!(result[3].is_stopped());
    }

    #[test]
    fn test_stop_filter_removes() {
        let filter = StopFilter::from_words(vec!["the"]).remove_stopped(true);
        let tokens = vec![Token::new("the", 0), Token::new("cat", 1)];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "cat");
    }

    #[test]
    fn test_empty_stoplist_passes_through() {
        let filter = StopFilter::new();
        assert!(filter.is_empty());
        let tokens = vec![Token::new("the", 0)];
        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert!(!result[0].is_stopped());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
        assert_eq!(StopFilter::from_words(vec!["a", "b"]).len(), 2);
    }
}
