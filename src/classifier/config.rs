//! Classifier configuration.
//!
//! # Examples
//!
//! ```
//! use genre_rank::classifier::config::ClassifierConfig;
//!
//! let config = ClassifierConfig::builder()
//!     .orders(vec![2, 1, 3])
//!     .stem(true)
//!     .stoplist(vec!["the", "a"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.orders, vec![1, 2, 3]);
//! assert!(config.auto_finalize);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GenreError, Result};
use crate::ngram::normalize_orders;

/// Default n-gram orders: unigrams and bigrams.
pub const DEFAULT_ORDERS: [usize; 2] = [1, 2];

/// Default number of distinct keys buffered before a training flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 65_536;

/// Configuration for an [`NGramClassifier`](super::NGramClassifier).
///
/// `stem`, `orders` and `stoplist` shape the stored tables and are persisted
/// with them; `auto_finalize` and `flush_threshold` only affect the running
/// process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Apply the Snowball English stemmer to every word.
    pub stem: bool,

    /// N-gram orders to extract, ascending and unique.
    pub orders: Vec<usize>,

    /// Words excluded from every table. Cleaned before use.
    pub stoplist: Vec<String>,

    /// Finalize implicitly when classifying with stale rank tables.
    pub auto_finalize: bool,

    /// Distinct n-grams buffered in memory per training flush.
    pub flush_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            stem: false,
            orders: DEFAULT_ORDERS.to_vec(),
            stoplist: Vec::new(),
            auto_finalize: true,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl ClassifierConfig {
    /// Create a new builder.
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }

    /// Check the configuration and put `orders` in canonical form.
    pub fn validate(mut self) -> Result<Self> {
        self.orders = normalize_orders(&self.orders)?;
        if self.flush_threshold == 0 {
            return Err(GenreError::invalid_config(
                "flush_threshold must be at least 1",
            ));
        }
        Ok(self)
    }

    /// Load a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<Self>(json)?.validate()
    }
}

/// Builder for [`ClassifierConfig`].
#[derive(Debug, Default)]
pub struct ClassifierConfigBuilder {
    config: ClassifierConfig,
}

impl ClassifierConfigBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: ClassifierConfig) -> Self {
        ClassifierConfigBuilder { config }
    }

    /// Enable or disable stemming.
    pub fn stem(mut self, stem: bool) -> Self {
        self.config.stem = stem;
        self
    }

    /// Set the n-gram orders.
    pub fn orders(mut self, orders: Vec<usize>) -> Self {
        self.config.orders = orders;
        self
    }

    /// Set the stoplist.
    pub fn stoplist<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.stoplist = words.into_iter().map(Into::into).collect();
        self
    }

    /// Choose between implicit finalization and a `NotFinalized` error.
    pub fn auto_finalize(mut self, auto_finalize: bool) -> Self {
        self.config.auto_finalize = auto_finalize;
        self
    }

    /// Set the training flush threshold.
    pub fn flush_threshold(mut self, flush_threshold: usize) -> Self {
        self.config.flush_threshold = flush_threshold;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ClassifierConfig> {
        self.config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert!(!config.stem);
        assert_eq!(config.orders, vec![1, 2]);
        assert!(config.stoplist.is_empty());
        assert!(config.auto_finalize);
        assert_eq!(config.flush_threshold, 65_536);
        assert_eq!(ClassifierConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn test_orders_normalized() {
        let config = ClassifierConfig::builder()
            .orders(vec![3, 1, 3])
            .build()
            .unwrap();
        assert_eq!(config.orders, vec![1, 3]);
    }

    #[test]
    fn test_invalid() {
        assert!(ClassifierConfig::builder().orders(vec![]).build().is_err());
        assert!(ClassifierConfig::builder().orders(vec![0]).build().is_err());
        assert!(
            ClassifierConfig::builder()
                .flush_threshold(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_from_json() {
        let config =
            ClassifierConfig::from_json(r#"{"stem": true, "orders": [2, 1], "auto_finalize": false}"#)
                .unwrap();
        assert!(config.stem);
        assert_eq!(config.orders, vec![1, 2]);
        assert!(!config.auto_finalize);
        assert_eq!(config.flush_threshold, DEFAULT_FLUSH_THRESHOLD);

        assert!(matches!(
            ClassifierConfig::from_json("{\"orders\": []}"),
            Err(GenreError::InvalidConfig(_))
        ));
        assert!(matches!(
            ClassifierConfig::from_json("not json"),
            Err(GenreError::Json(_))
        ));
    }
}
