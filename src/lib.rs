//! # genre-rank
//!
//! Genre classification by n-gram rank correlation.
//!
//! Training text is cleaned, cut into n-grams and counted into durable
//! per-category frequency tables. Finalizing converts the counts into
//! midrank tables, and classification picks the category whose ranking
//! correlates best (Pearson's r) with the query's own n-gram ranking.
//!
//! ## Features
//!
//! - Durable, crash-safe frequency and rank tables (redb)
//! - Bounded memory while training on arbitrarily long text
//! - Pluggable text analysis pipeline with optional Snowball stemming
//! - Categories scored in parallel during classification
//!
//! ## Example
//!
//! ```
//! use genre_rank::prelude::*;
//!
//! # fn main() -> genre_rank::error::Result<()> {
//! let mut classifier = NGramClassifier::in_memory(ClassifierConfig::default())?;
//! classifier.train("nursery", &"the cat sat on the mat ".repeat(10))?;
//! classifier.train("finance", &"stock market prices rose sharply today ".repeat(10))?;
//! classifier.finalize()?;
//!
//! assert_eq!(classifier.classify("the cat sat on the mat", 0.0)?, "nursery");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod correlation;
pub mod error;
pub mod frequency;
pub mod ngram;
pub mod rank;
pub mod storage;

pub mod prelude {
    pub use crate::classifier::config::ClassifierConfig;
    pub use crate::classifier::state::ClassifierState;
    pub use crate::classifier::{Classifier, NGramClassifier};
    pub use crate::error::{GenreError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
