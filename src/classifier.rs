//! The persistent n-gram rank-correlation classifier.
//!
//! Training streams cleaned words through the n-gram extractor into
//! per-category and global frequency tables. Finalizing turns every
//! frequency table into a midrank table. Classifying ranks the query's own
//! n-grams and correlates them, n-gram by n-gram, against each category's
//! rank table; the category with the highest Pearson correlation wins.
//!
//! # Examples
//!
//! ```
//! use genre_rank::classifier::{Classifier, NGramClassifier};
//! use genre_rank::classifier::config::ClassifierConfig;
//!
//! # fn main() -> genre_rank::error::Result<()> {
//! let config = ClassifierConfig::builder().orders(vec![1]).build()?;
//! let mut classifier = NGramClassifier::in_memory(config)?;
//!
//! classifier.train("pets", &"the cat sat on the mat ".repeat(20))?;
//! classifier.train("money", &"stock market prices rose sharply today ".repeat(20))?;
//! classifier.finalize()?;
//!
//! assert_eq!(classifier.classify("the cat sat on the mat", 0.0)?, "pets");
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::{Arc, LazyLock};

use ahash::AHashMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use regex::Regex;

use crate::analysis::analyzer::cleaner::TextCleaner;
use crate::correlation::PairedSamples;
use crate::error::{GenreError, Result};
use crate::frequency::{FrequencyStore, TableId, TableKind};
use crate::ngram::{NGramExtractor, extract};
use crate::rank::RankTable;
use crate::storage::file::FileStorageConfig;
use crate::storage::memory::MemoryStorageConfig;
use crate::storage::{Storage, StorageConfig, StorageFactory};

pub mod config;
pub mod metadata;
pub mod state;

use self::config::ClassifierConfig;
use self::metadata::Metadata;
use self::state::ClassifierState;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid category pattern"));

/// Turn a user-supplied category name into a table-safe identifier.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`.
pub fn sanitize_category(category: &str) -> Result<String> {
    if category.is_empty() {
        return Err(GenreError::invalid_argument("category name must not be empty"));
    }
    Ok(NON_WORD.replace_all(category, "_").into_owned())
}

/// Uniform interface over genre classifiers.
pub trait Classifier {
    /// Add `text` to the training data of `category`.
    fn train(&mut self, category: &str, text: &str) -> Result<()>;

    /// Rebuild every rank table from the current frequencies.
    fn finalize(&mut self) -> Result<()>;

    /// Return the best matching category for `text`.
    fn classify(&mut self, text: &str, threshold: f64) -> Result<String>;

    /// Trained categories, in training order.
    fn categories(&self) -> &[String];

    /// Persist the classifier's metadata.
    fn save(&self) -> Result<()>;
}

/// N-gram rank-correlation classifier over a durable frequency store.
pub struct NGramClassifier {
    config: ClassifierConfig,
    cleaner: TextCleaner,
    store: FrequencyStore,
    storage: Arc<dyn Storage>,
    metadata: Metadata,
    state: ClassifierState,
}

impl NGramClassifier {
    /// Open (or create) a classifier in `data_dir` with the default
    /// configuration.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::open_with_config(data_dir, ClassifierConfig::default())
    }

    /// Open (or create) a classifier in `data_dir`.
    ///
    /// When the directory already holds a classifier, its persisted stemming
    /// flag, orders and stoplist replace the ones in `config`.
    pub fn open_with_config<P: AsRef<Path>>(data_dir: P, config: ClassifierConfig) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let config = config.validate()?;
        let storage =
            StorageFactory::create(StorageConfig::File(FileStorageConfig::new(data_dir)))?;
        let store = FrequencyStore::open(data_dir)?;
        info!("opening classifier at {}", data_dir.display());
        Self::assemble(config, storage, store)
    }

    /// Create a classifier that lives only in memory.
    pub fn in_memory(config: ClassifierConfig) -> Result<Self> {
        let config = config.validate()?;
        let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
        let store = FrequencyStore::open_in_memory()?;
        Self::assemble(config, storage, store)
    }

    fn assemble(
        mut config: ClassifierConfig,
        storage: Arc<dyn Storage>,
        store: FrequencyStore,
    ) -> Result<Self> {
        let Some(metadata) = Metadata::load(storage.as_ref())? else {
            let cleaner = TextCleaner::new(config.stem, &config.stoplist)?;
            config.stoplist = cleaner.stoplist().to_vec();
            let metadata = Metadata::new(config.stem, config.orders.clone(), config.stoplist.clone());
            return Ok(NGramClassifier {
                config,
                cleaner,
                store,
                storage,
                metadata,
                state: ClassifierState::Empty,
            });
        };

        let supplied = TextCleaner::new(config.stem, &config.stoplist)?;
        if config.stem != metadata.stem
            || config.orders != metadata.orders
            || supplied.stoplist() != metadata.stoplist.as_slice()
        {
            let defaults = ClassifierConfig::default();
            let message = format!(
                "using persisted settings (stem={}, orders={:?}, {} stop words) instead of the supplied ones",
                metadata.stem,
                metadata.orders,
                metadata.stoplist.len()
            );
            if config.stem == defaults.stem
                && config.orders == defaults.orders
                && config.stoplist.is_empty()
            {
                debug!("{message}");
            } else {
                warn!("{message}");
            }
        }

        config.stem = metadata.stem;
        config.orders = metadata.orders.clone();
        config.stoplist = metadata.stoplist.clone();
        let cleaner = TextCleaner::from_cleaned(metadata.stem, metadata.stoplist.clone());

        let state = Self::recover_state(&store, &metadata)?;
        info!(
            "loaded {} categories, state {}",
            metadata.categories.len(),
            state
        );

        Ok(NGramClassifier {
            config,
            cleaner,
            store,
            storage,
            metadata,
            state,
        })
    }

    fn recover_state(store: &FrequencyStore, metadata: &Metadata) -> Result<ClassifierState> {
        if metadata.categories.is_empty() {
            return Ok(ClassifierState::Empty);
        }
        if !store.generations()?.ranks_current() {
            return Ok(ClassifierState::Training);
        }

        let names = store.table_names()?;
        let has_rank = |id: &TableId| {
            let name = id.table_name(TableKind::Rank);
            names.iter().any(|n| *n == name)
        };
        let complete = has_rank(&TableId::Global)
            && metadata
                .categories
                .iter()
                .all(|c| has_rank(&TableId::category(c.as_str())));

        Ok(if complete {
            ClassifierState::Finalized
        } else {
            ClassifierState::Training
        })
    }

    /// Train `category` on `text`.
    ///
    /// The category name is sanitized first; see [`sanitize_category`].
    /// Finalized rank tables become stale before the first count is written,
    /// so a failure part-way through never leaves them looking current.
    pub fn train(&mut self, category: &str, text: &str) -> Result<()> {
        let category = sanitize_category(category)?;
        let words = self.cleaner.clean(text)?;
        let extractor = NGramExtractor::new(words, &self.config.orders)?;
        let tables = [TableId::category(category.as_str()), TableId::Global];

        if !self.metadata.has_category(&category) {
            self.metadata.categories.push(category.clone());
            self.metadata.save(self.storage.as_ref())?;
        }
        self.state = ClassifierState::Training;

        let mut pending: AHashMap<String, u64> = AHashMap::new();
        let mut total = 0usize;
        for (_, ngram) in extractor {
            *pending.entry(ngram).or_insert(0) += 1;
            total += 1;
            if pending.len() >= self.config.flush_threshold {
                self.store.apply_counts(&tables, &pending)?;
                pending.clear();
            }
        }
        self.store.apply_counts(&tables, &pending)?;

        debug!("trained {} n-grams into {}", total, category);
        Ok(())
    }

    /// Recompute the global and per-category rank tables.
    ///
    /// Running it again without training in between produces identical
    /// tables. With nothing trained it does nothing.
    pub fn finalize(&mut self) -> Result<()> {
        if self.metadata.categories.is_empty() {
            info!("nothing trained, skipping finalize");
            return Ok(());
        }

        let global = self.store.write_ranks(&TableId::Global)?;
        for category in &self.metadata.categories {
            self.store.write_ranks(&TableId::category(category.as_str()))?;
        }

        self.store.mark_ranked()?;
        self.metadata.save(self.storage.as_ref())?;
        self.state = ClassifierState::Finalized;

        info!(
            "finalized {} categories ({} distinct n-grams)",
            self.metadata.categories.len(),
            global
        );
        Ok(())
    }

    /// Score `text` against every category.
    ///
    /// Scores are sorted ascending by correlation; ties keep training order,
    /// so the winner of [`classify`](Self::classify) is the last element.
    pub fn classify_scores(&mut self, text: &str, threshold: f64) -> Result<Vec<(String, f64)>> {
        if self.metadata.categories.is_empty() {
            return Err(GenreError::NoCategories);
        }
        // counts written straight through the store also invalidate ranks
        if self.state.is_finalized() && !self.store.generations()?.ranks_current() {
            self.state = ClassifierState::Training;
        }
        if !self.state.is_finalized() {
            if !self.config.auto_finalize {
                return Err(GenreError::NotFinalized);
            }
            warn!("rank tables are stale, finalizing before classification");
            self.finalize()?;
        }

        let words = self.cleaner.clean(text)?;
        let ngrams = extract(&words, &self.config.orders)?;
        let query = RankTable::from_keys(ngrams.iter().map(String::as_str));

        let store = &self.store;
        let mut scores = self
            .metadata
            .categories
            .par_iter()
            .map(|category| {
                let reader = store.rank_reader(&TableId::category(category.as_str()))?;
                let mut samples = PairedSamples::new(threshold);
                for ngram in &ngrams {
                    samples.offer(query.get(ngram), reader.get(ngram)?);
                }
                let score = samples.pearson();
                debug!(
                    "{}: r={:.6} over {} pairs",
                    category,
                    score,
                    samples.len()
                );
                Ok((category.clone(), score))
            })
            .collect::<Result<Vec<_>>>()?;

        scores.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(scores)
    }

    /// Return the category whose rank table best correlates with `text`.
    pub fn classify(&mut self, text: &str, threshold: f64) -> Result<String> {
        self.classify_scores(text, threshold)?
            .pop()
            .map(|(category, _)| category)
            .ok_or(GenreError::NoCategories)
    }

    /// Trained categories, in training order.
    pub fn categories(&self) -> &[String] {
        &self.metadata.categories
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Effective configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Word cleaner used for training and queries.
    pub fn cleaner(&self) -> &TextCleaner {
        &self.cleaner
    }

    /// The underlying frequency store.
    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    /// Write the metadata record.
    pub fn save(&self) -> Result<()> {
        self.metadata.save(self.storage.as_ref())
    }

    /// Persist metadata and release every handle.
    pub fn close(mut self) -> Result<()> {
        self.metadata.save(self.storage.as_ref())?;
        self.storage.sync()?;
        if let Some(storage) = Arc::get_mut(&mut self.storage) {
            storage.close()?;
        }
        self.store.close()
    }
}

impl Classifier for NGramClassifier {
    fn train(&mut self, category: &str, text: &str) -> Result<()> {
        NGramClassifier::train(self, category, text)
    }

    fn finalize(&mut self) -> Result<()> {
        NGramClassifier::finalize(self)
    }

    fn classify(&mut self, text: &str, threshold: f64) -> Result<String> {
        NGramClassifier::classify(self, text, threshold)
    }

    fn categories(&self) -> &[String] {
        NGramClassifier::categories(self)
    }

    fn save(&self) -> Result<()> {
        NGramClassifier::save(self)
    }
}

impl std::fmt::Debug for NGramClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NGramClassifier")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("categories", &self.metadata.categories)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unigram_classifier() -> NGramClassifier {
        let config = ClassifierConfig::builder().orders(vec![1]).build().unwrap();
        NGramClassifier::in_memory(config).unwrap()
    }

    fn train_pets_and_money(classifier: &mut NGramClassifier) {
        classifier
            .train("A", &"the cat sat on the mat ".repeat(10))
            .unwrap();
        classifier
            .train("B", &"stock market prices rose sharply today ".repeat(10))
            .unwrap();
    }

    #[test]
    fn test_sanitize_category() {
        assert_eq!(sanitize_category("sci-fi/fantasy").unwrap(), "sci_fi_fantasy");
        assert_eq!(sanitize_category("news_2024").unwrap(), "news_2024");
        assert_eq!(sanitize_category("café").unwrap(), "caf_");
        assert!(matches!(
            sanitize_category(""),
            Err(GenreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut classifier = unigram_classifier();
        assert_eq!(classifier.state(), ClassifierState::Empty);

        classifier.finalize().unwrap();
        assert_eq!(classifier.state(), ClassifierState::Empty);

        train_pets_and_money(&mut classifier);
        assert_eq!(classifier.state(), ClassifierState::Training);

        classifier.finalize().unwrap();
        assert_eq!(classifier.state(), ClassifierState::Finalized);

        classifier.train("A", "more text").unwrap();
        assert_eq!(classifier.state(), ClassifierState::Training);
    }

    #[test]
    fn test_classify_end_to_end() {
        let mut classifier = unigram_classifier();
        train_pets_and_money(&mut classifier);
        classifier.finalize().unwrap();

        assert_eq!(classifier.categories(), &["A".to_string(), "B".to_string()]);
        assert_eq!(classifier.classify("the cat sat on the mat", 0.0).unwrap(), "A");
        assert_eq!(
            classifier
                .classify("stock market prices rose sharply today", 0.0)
                .unwrap(),
            "B"
        );
    }

    #[test]
    fn test_classify_without_categories() {
        let mut classifier = unigram_classifier();
        assert!(matches!(
            classifier.classify("anything", 0.0),
            Err(GenreError::NoCategories)
        ));
    }

    #[test]
    fn test_auto_finalize() {
        let mut classifier = unigram_classifier();
        train_pets_and_money(&mut classifier);

        assert_eq!(classifier.classify("the cat sat on the mat", 0.0).unwrap(), "A");
        assert_eq!(classifier.state(), ClassifierState::Finalized);
    }

    #[test]
    fn test_strict_mode() {
        let config = ClassifierConfig::builder()
            .orders(vec![1])
            .auto_finalize(false)
            .build()
            .unwrap();
        let mut classifier = NGramClassifier::in_memory(config).unwrap();
        train_pets_and_money(&mut classifier);

        assert!(matches!(
            classifier.classify("the cat", 0.0),
            Err(GenreError::NotFinalized)
        ));
        classifier.finalize().unwrap();
        assert_eq!(classifier.classify("the cat sat on the mat", 0.0).unwrap(), "A");
    }

    #[test]
    fn test_tie_goes_to_last_trained_category() {
        let mut classifier = unigram_classifier();
        classifier.train("first", "alpha beta").unwrap();
        classifier.train("second", "gamma delta").unwrap();
        classifier.finalize().unwrap();

        // nothing overlaps, every score is 0
        let scores = classifier.classify_scores("omega", 0.0).unwrap();
        assert!(scores.iter().all(|(_, s)| *s == 0.0));
        assert_eq!(classifier.classify("omega", 0.0).unwrap(), "second");
    }

    #[test]
    fn test_train_counts_global_and_category() {
        let mut classifier = unigram_classifier();
        classifier.train("A", "the cat the").unwrap();
        classifier.train("B", "the dog").unwrap();

        let store = classifier.store();
        assert_eq!(store.count(&TableId::category("A"), "the").unwrap(), 2);
        assert_eq!(store.count(&TableId::category("B"), "the").unwrap(), 1);
        assert_eq!(store.count(&TableId::Global, "the").unwrap(), 3);
        assert_eq!(store.count(&TableId::Global, "dog").unwrap(), 1);
    }

    #[test]
    fn test_small_flush_threshold_matches_single_flush() {
        let text = "one two three two one four five one ".repeat(5);

        let mut batched = NGramClassifier::in_memory(
            ClassifierConfig::builder().flush_threshold(2).build().unwrap(),
        )
        .unwrap();
        batched.train("c", &text).unwrap();

        let mut single = NGramClassifier::in_memory(ClassifierConfig::default()).unwrap();
        single.train("c", &text).unwrap();

        let id = TableId::category("c");
        assert_eq!(
            batched.store().frequencies(&id).unwrap(),
            single.store().frequencies(&id).unwrap()
        );
    }

    #[test]
    fn test_stoplist_excluded_from_tables() {
        let config = ClassifierConfig::builder()
            .orders(vec![1])
            .stoplist(vec!["The"])
            .build()
            .unwrap();
        let mut classifier = NGramClassifier::in_memory(config).unwrap();
        classifier.train("A", "the cat").unwrap();

        assert_eq!(classifier.config().stoplist, vec!["the".to_string()]);
        assert_eq!(classifier.store().count(&TableId::category("A"), "the").unwrap(), 0);
        assert_eq!(classifier.store().count(&TableId::category("A"), "cat").unwrap(), 1);
    }

    #[test]
    fn test_close_releases_memory_backend() {
        let mut classifier = unigram_classifier();
        classifier.train("A", "a b c").unwrap();
        classifier.finalize().unwrap();
        classifier.close().unwrap();
    }

    #[test]
    fn test_trait_object() {
        let mut classifier: Box<dyn Classifier> = Box::new(unigram_classifier());
        classifier.train("x", "a b c").unwrap();
        classifier.finalize().unwrap();
        classifier.save().unwrap();
        assert_eq!(classifier.categories(), &["x".to_string()]);
        assert_eq!(classifier.classify("a b", 0.0).unwrap(), "x");
    }
}
