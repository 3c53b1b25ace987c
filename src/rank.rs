//! Frequency-to-rank transform with midrank tie handling.
//!
//! [`midranks`] is the single primitive behind every rank table: the
//! persisted per-category and global tables written by `finalize()` and the
//! query-local table built during classification.
//!
//! Keys are ordered by count descending (ties broken by key ascending), then
//! cut into maximal runs of equal count. Every key in a run of `g` keys that
//! starts at 0-based offset `o` receives the rank `o + (g + 1) / 2`, which is
//! the mean of the 1-based positions the run occupies.
//!
//! # Examples
//!
//! ```
//! use genre_rank::rank::midranks;
//!
//! let ranks = midranks(vec![("a", 5), ("b", 3), ("c", 3), ("d", 1)]);
//! assert_eq!(ranks, vec![("a", 1.0), ("b", 2.5), ("c", 2.5), ("d", 4.0)]);
//! ```

use ahash::AHashMap;

/// Rank `(key, count)` pairs, most frequent first.
///
/// The output is ordered by count descending then key ascending, so equal
/// input always produces identical output.
pub fn midranks<K: Ord>(mut entries: Vec<(K, u64)>) -> Vec<(K, f64)> {
    entries.sort_unstable_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));

    let mut ranked = Vec::with_capacity(entries.len());
    let mut offset = 0usize;
    let mut iter = entries.into_iter().peekable();

    while let Some((key, count)) = iter.next() {
        let mut group = vec![key];
        while let Some((next_key, _)) = iter.next_if(|(_, c)| *c == count) {
            group.push(next_key);
        }

        let size = group.len();
        let rank = offset as f64 + (size as f64 + 1.0) / 2.0;
        ranked.extend(group.into_iter().map(|key| (key, rank)));
        offset += size;
    }

    ranked
}

/// In-memory rank table.
///
/// Used for the query side of classification, where the table is small and
/// short-lived. Missing keys rank as `0.0`.
#[derive(Clone, Debug, Default)]
pub struct RankTable {
    ranks: AHashMap<String, f64>,
}

impl RankTable {
    /// Build a table by counting `keys` and ranking the counts.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        for key in keys {
            *counts.entry(key.into()).or_insert(0) += 1;
        }
        Self::from_counts(counts)
    }

    /// Build a table from a frequency snapshot.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let ranks = midranks(counts.into_iter().collect()).into_iter().collect();
        RankTable { ranks }
    }

    /// Rank of `key`, `0.0` when absent.
    pub fn get(&self, key: &str) -> f64 {
        self.ranks.get(key).copied().unwrap_or(0.0)
    }

    /// Number of ranked keys.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
