//! Text analysis for genre-rank.
//!
//! Raw text becomes a sequence of cleaned word tokens through a
//! tokenizer followed by a chain of token filters:
//!
//! ```text
//! Whitespace → Lowercase → Strip punctuation → [Stem] → Stoplist → Remove empty
//! ```
//!
//! [`analyzer::TextCleaner`] assembles that chain from a classifier
//! configuration; the individual pieces are public so other pipelines can be
//! built with [`analyzer::PipelineAnalyzer`].

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
