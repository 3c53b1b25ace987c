//! Analyzers turn raw text into a stream of cleaned tokens.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → N-gram extractor
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`TextCleaner`](cleaner::TextCleaner) - The classifier's word cleaning pipeline
//!
//! # Examples
//!
//! ```
//! use genre_rank::analysis::analyzer::Analyzer;
//! use genre_rank::analysis::analyzer::cleaner::TextCleaner;
//!
//! let cleaner = TextCleaner::new::<&str>(false, &[]).unwrap();
//! let tokens: Vec<_> = cleaner.analyze("Hello, World!").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so analyzers can be shared with the
/// worker threads that score categories.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod cleaner;
pub mod pipeline;
