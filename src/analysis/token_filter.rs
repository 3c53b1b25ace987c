//! Token filter implementations for token transformation.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`strip::StripFilter`] - Trims non-word characters and possessive `'s`
//! - [`stem::StemFilter`] - Reduces words to their stem form
//! - [`stop::StopFilter`] - Marks stoplisted words as stopped
//! - [`remove_empty::RemoveEmptyFilter`] - Drops empty and stopped tokens
//!
//! # Examples
//!
//! ```
//! use genre_rank::analysis::token_filter::Filter;
//! use genre_rank::analysis::token_filter::lowercase::LowercaseFilter;
//! use genre_rank::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// Filters receive a stream of tokens and produce a new stream. Tokens that
/// are already stopped pass through untouched.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod remove_empty;
pub mod stem;
pub mod stop;
pub mod strip;
