//! The word cleaning pipeline used by the classifier.
//!
//! Every piece of text the classifier sees, training corpora, queries and
//! the stoplist itself, passes through the same chain:
//!
//! ```text
//! Whitespace → Lowercase → Strip → [Stem] → Stop → RemoveEmpty
//! ```
//!
//! The stoplist is cleaned with the chain minus the stop stage, so an entry
//! like `"The,"` matches the cleaned token `the`, and with stemming enabled
//! `"running"` stops `run`.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::token_filter::strip::StripFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Analyzer that produces the classifier's cleaned words.
#[derive(Clone, Debug)]
pub struct TextCleaner {
    inner: PipelineAnalyzer,
    stem: bool,
    stoplist: Vec<String>,
}

impl TextCleaner {
    /// Build a cleaner. `stoplist` entries are cleaned before use.
    pub fn new<S: AsRef<str>>(stem: bool, stoplist: &[S]) -> Result<Self> {
        let base = Self::base_pipeline(stem);

        let mut cleaned = BTreeSet::new();
        for word in stoplist {
            cleaned.extend(
                base.analyze(word.as_ref())?
                    .filter(|token| !token.is_stopped() && !token.is_empty())
                    .map(|token| token.text),
            );
        }

        Ok(Self::assemble(base, stem, cleaned.into_iter().collect()))
    }

    /// Build a cleaner from a stoplist that is already in cleaned form,
    /// such as one read back from persisted metadata.
    pub fn from_cleaned(stem: bool, mut stoplist: Vec<String>) -> Self {
        stoplist.sort();
        stoplist.dedup();
        Self::assemble(Self::base_pipeline(stem), stem, stoplist)
    }

    fn assemble(base: PipelineAnalyzer, stem: bool, stoplist: Vec<String>) -> Self {
        let stop_words: HashSet<String> = stoplist.iter().cloned().collect();
        let inner = base
            .add_filter(Arc::new(StopFilter::with_stop_words(stop_words)))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name("cleaner");

        TextCleaner {
            inner,
            stem,
            stoplist,
        }
    }

    /// Tokenize, lowercase, strip and optionally stem, without the stop stage.
    fn base_pipeline(stem: bool) -> PipelineAnalyzer {
        let mut pipeline = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StripFilter::new()));
        if stem {
            pipeline = pipeline.add_filter(Arc::new(StemFilter::new()));
        }
        pipeline
    }

    /// Clean `text` into a list of words.
    pub fn clean(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.inner.analyze(text)?.map(|token| token.text).collect())
    }

    /// Whether stemming is enabled.
    pub fn stem(&self) -> bool {
        self.stem
    }

    /// The cleaned stoplist, sorted.
    pub fn stoplist(&self) -> &[String] {
        &self.stoplist
    }
}

impl Analyzer for TextCleaner {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "cleaner"
    }
}
