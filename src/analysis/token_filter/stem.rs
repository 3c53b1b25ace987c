//! Stemming token filter and stemmer implementations.
//!
//! Stemming is a pluggable capability: anything implementing [`Stemmer`] can
//! be dropped into a [`StemFilter`]. The default is the Snowball English
//! stemmer from `rust-stemmers`.
//!
//! # Examples
//!
//! ```
//! use genre_rank::analysis::token_filter::stem::{SnowballStemmer, Stemmer};
//!
//! let stemmer = SnowballStemmer::english();
//! assert_eq!(stemmer.stem("running"), "run");
//! ```

use rust_stemmers::Algorithm;

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Snowball stemmer backed by `rust-stemmers`.
pub struct SnowballStemmer {
    stemmer: rust_stemmers::Stemmer,
    algorithm: Algorithm,
}

impl SnowballStemmer {
    /// Create a stemmer for the given Snowball algorithm.
    pub fn new(algorithm: Algorithm) -> Self {
        SnowballStemmer {
            stemmer: rust_stemmers::Stemmer::create(algorithm),
            algorithm,
        }
    }

    /// Create an English (Porter2) stemmer.
    pub fn english() -> Self {
        Self::new(Algorithm::English)
    }
}

impl Clone for SnowballStemmer {
    fn clone(&self) -> Self {
        // rust_stemmers::Stemmer is not Clone
        Self::new(self.algorithm)
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    fn name(&self) -> &'static str {
        "snowball"
    }
}

/// Stemmer that returns words unchanged.
#[derive(Clone, Debug, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Filter that applies stemming to tokens.
pub struct StemFilter {
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a new stem filter with the English Snowball stemmer.
    pub fn new() -> Self {
        StemFilter {
            stemmer: Box::new(SnowballStemmer::english()),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let stemmed = self.stemmer.stem(&token.text);
                    token.with_text(stemmed)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}
