//! Durable n-gram frequency and rank tables backed by redb.
//!
//! One database file holds every table of a classifier:
//!
//! | table               | contents                              |
//! |---------------------|---------------------------------------|
//! | `freq.global`       | n-gram counts over all training text  |
//! | `freq.cat.<name>`   | n-gram counts for one category        |
//! | `rank.global`       | midranks of `freq.global`             |
//! | `rank.cat.<name>`   | midranks of `freq.cat.<name>`         |
//! | `generation`        | `trained` and `ranked` counters       |
//!
//! Counts only ever grow; rank tables are wholly replaced by
//! [`FrequencyStore::write_ranks`]. All writes go through redb transactions,
//! so a crash leaves every table at its last committed state.
//!
//! Every transaction that changes a frequency table also bumps the `trained`
//! counter. [`FrequencyStore::mark_ranked`] copies it into `ranked`, so rank
//! tables are current exactly when the two agree.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::debug;
use redb::backends::InMemoryBackend;
use redb::{
    Database, ReadOnlyTable, ReadableTable, ReadableTableMetadata, TableDefinition, TableError,
    TableHandle, WriteTransaction,
};

use crate::error::{GenreError, Result};
use crate::rank::midranks;

/// File name of the frequency database inside a data directory.
pub const DATABASE_FILE: &str = "ngrams.redb";

const GENERATION: TableDefinition<&'static str, u64> = TableDefinition::new("generation");
const TRAINED: &str = "trained";
const RANKED: &str = "ranked";

/// Training generation of the counts and of the rank tables built from them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Generations {
    /// Bumped by every committed change to a frequency table.
    pub trained: u64,
    /// The `trained` value the rank tables were last built from.
    pub ranked: Option<u64>,
}

impl Generations {
    /// Whether the rank tables reflect every committed count.
    pub fn ranks_current(&self) -> bool {
        self.ranked == Some(self.trained)
    }
}

/// Which family of table to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Integer n-gram counts.
    Frequency,
    /// Midranks derived from a frequency table.
    Rank,
}

impl TableKind {
    fn prefix(self) -> &'static str {
        match self {
            TableKind::Frequency => "freq",
            TableKind::Rank => "rank",
        }
    }
}

/// A table's owner: the global aggregate or one category.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    /// Aggregate over every category.
    Global,
    /// A single category.
    Category(String),
}

impl TableId {
    /// Table id for a category.
    pub fn category<S: Into<String>>(name: S) -> Self {
        TableId::Category(name.into())
    }

    /// Physical table name for the given kind.
    pub fn table_name(&self, kind: TableKind) -> String {
        match self {
            TableId::Global => format!("{}.global", kind.prefix()),
            TableId::Category(name) => format!("{}.cat.{}", kind.prefix(), name),
        }
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableId::Global => write!(f, "global"),
            TableId::Category(name) => write!(f, "{name}"),
        }
    }
}

fn freq_def(name: &str) -> TableDefinition<'_, &'static str, u64> {
    TableDefinition::new(name)
}

fn rank_def(name: &str) -> TableDefinition<'_, &'static str, f64> {
    TableDefinition::new(name)
}

/// Durable store of n-gram frequency and rank tables.
pub struct FrequencyStore {
    db: Database,
    path: Option<PathBuf>,
}

impl FrequencyStore {
    /// Open or create the store inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DATABASE_FILE);
        let db = Database::create(&path).map_err(|e| {
            GenreError::storage(format!("failed to open {}: {e}", path.display()))
        })?;
        debug!("opened frequency store at {}", path.display());
        Ok(FrequencyStore {
            db,
            path: Some(path),
        })
    }

    /// Create an ephemeral store that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Ok(FrequencyStore { db, path: None })
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Add one to `key` in `table`.
    pub fn increment(&self, table: &TableId, key: &str) -> Result<()> {
        let mut counts = AHashMap::with_capacity(1);
        counts.insert(key.to_string(), 1);
        self.apply_counts(std::slice::from_ref(table), &counts)
    }

    /// Add a batch of counts to every table in `tables` in one transaction.
    ///
    /// Missing tables are created.
    pub fn apply_counts(&self, tables: &[TableId], counts: &AHashMap<String, u64>) -> Result<()> {
        if counts.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin_write()?;
        for id in tables {
            let name = id.table_name(TableKind::Frequency);
            let mut table = txn.open_table(freq_def(&name))?;
            for (key, delta) in counts {
                let current = table.get(key.as_str())?.map(|v| v.value()).unwrap_or(0);
                table.insert(key.as_str(), current.saturating_add(*delta))?;
            }
        }
        bump_trained(&txn)?;
        txn.commit()?;

        debug!(
            "flushed {} n-gram counts into {} table(s)",
            counts.len(),
            tables.len()
        );
        Ok(())
    }

    /// Count of `key` in `table`, 0 when absent.
    pub fn count(&self, table: &TableId, key: &str) -> Result<u64> {
        let name = table.table_name(TableKind::Frequency);
        match self.open_read(freq_def(&name))? {
            Some(t) => Ok(t.get(key)?.map(|v| v.value()).unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Every `(key, count)` of `table`, in key order.
    pub fn frequencies(&self, table: &TableId) -> Result<Vec<(String, u64)>> {
        let name = table.table_name(TableKind::Frequency);
        let Some(t) = self.open_read(freq_def(&name))? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(t.len()? as usize);
        for item in t.iter()? {
            let (key, count) = item?;
            entries.push((key.value().to_string(), count.value()));
        }
        Ok(entries)
    }

    /// Every `(key, rank)` of the rank table for `table`, in key order.
    pub fn ranks(&self, table: &TableId) -> Result<Vec<(String, f64)>> {
        let name = table.table_name(TableKind::Rank);
        let Some(t) = self.open_read(rank_def(&name))? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(t.len()? as usize);
        for item in t.iter()? {
            let (key, rank) = item?;
            entries.push((key.value().to_string(), rank.value()));
        }
        Ok(entries)
    }

    /// Number of keys in a table, 0 when it does not exist.
    pub fn len(&self, kind: TableKind, table: &TableId) -> Result<u64> {
        let name = table.table_name(kind);
        let len = match kind {
            TableKind::Frequency => match self.open_read(freq_def(&name))? {
                Some(t) => t.len()?,
                None => 0,
            },
            TableKind::Rank => match self.open_read(rank_def(&name))? {
                Some(t) => t.len()?,
                None => 0,
            },
        };
        Ok(len)
    }

    /// Whether a table is missing or empty.
    pub fn is_empty(&self, kind: TableKind, table: &TableId) -> Result<bool> {
        Ok(self.len(kind, table)? == 0)
    }

    /// Whether a table exists.
    pub fn has_table(&self, kind: TableKind, table: &TableId) -> Result<bool> {
        let name = table.table_name(kind);
        Ok(self.table_names()?.iter().any(|n| *n == name))
    }

    /// Names of every table in the database.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let names = txn
            .list_tables()?
            .map(|handle| handle.name().to_string())
            .collect();
        Ok(names)
    }

    /// Erase a table entirely. Returns whether it existed.
    pub fn erase_all(&self, kind: TableKind, table: &TableId) -> Result<bool> {
        let name = table.table_name(kind);
        let txn = self.db.begin_write()?;
        let existed = match kind {
            TableKind::Frequency => txn.delete_table(freq_def(&name))?,
            TableKind::Rank => txn.delete_table(rank_def(&name))?,
        };
        if existed && kind == TableKind::Frequency {
            bump_trained(&txn)?;
        }
        txn.commit()?;
        Ok(existed)
    }

    /// Current training and ranking generations.
    pub fn generations(&self) -> Result<Generations> {
        let Some(t) = self.open_read(GENERATION)? else {
            return Ok(Generations::default());
        };
        Ok(Generations {
            trained: t.get(TRAINED)?.map(|v| v.value()).unwrap_or(0),
            ranked: t.get(RANKED)?.map(|v| v.value()),
        })
    }

    /// Record that the rank tables now reflect every committed count.
    ///
    /// Call once every rank table has been rewritten. Returns the generation
    /// that was marked.
    pub fn mark_ranked(&self) -> Result<u64> {
        let txn = self.db.begin_write()?;
        let trained = {
            let mut table = txn.open_table(GENERATION)?;
            let trained = table.get(TRAINED)?.map(|v| v.value()).unwrap_or(0);
            table.insert(RANKED, trained)?;
            trained
        };
        txn.commit()?;
        Ok(trained)
    }

    /// Replace the rank table of `table` with the midranks of its current
    /// frequencies. Returns the number of ranked keys.
    pub fn write_ranks(&self, table: &TableId) -> Result<usize> {
        let ranked = midranks(self.frequencies(table)?);
        let name = table.table_name(TableKind::Rank);

        let txn = self.db.begin_write()?;
        txn.delete_table(rank_def(&name))?;
        {
            let mut out = txn.open_table(rank_def(&name))?;
            for (key, rank) in &ranked {
                out.insert(key.as_str(), *rank)?;
            }
        }
        txn.commit()?;

        debug!("ranked {} n-grams for {}", ranked.len(), table);
        Ok(ranked.len())
    }

    /// Open a read-only view of a rank table.
    ///
    /// Each reader owns its own read transaction, so readers can be used from
    /// different threads at once.
    pub fn rank_reader(&self, table: &TableId) -> Result<RankReader> {
        let name = table.table_name(TableKind::Rank);
        Ok(RankReader {
            table: self.open_read(rank_def(&name))?,
        })
    }

    /// Release the database.
    pub fn close(self) -> Result<()> {
        if let Some(path) = &self.path {
            debug!("closing frequency store at {}", path.display());
        }
        drop(self.db);
        Ok(())
    }

    fn open_read<V: redb::Value + 'static>(
        &self,
        def: TableDefinition<'_, &'static str, V>,
    ) -> Result<Option<ReadOnlyTable<&'static str, V>>> {
        let txn = self.db.begin_read()?;
        match txn.open_table(def) {
            Ok(t) => Ok(Some(t)),
            Err(TableError::TableDoesNotExist(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn bump_trained(txn: &WriteTransaction) -> Result<()> {
    let mut table = txn.open_table(GENERATION)?;
    let current = table.get(TRAINED)?.map(|v| v.value()).unwrap_or(0);
    table.insert(TRAINED, current + 1)?;
    Ok(())
}

impl std::fmt::Debug for FrequencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrequencyStore")
            .field("path", &self.path)
            .finish()
    }
}

/// Point lookups into one persisted rank table.
pub struct RankReader {
    table: Option<ReadOnlyTable<&'static str, f64>>,
}

impl RankReader {
    /// Rank of `key`, `0.0` when absent.
    pub fn get(&self, key: &str) -> Result<f64> {
        match &self.table {
            Some(t) => Ok(t.get(key)?.map(|v| v.value()).unwrap_or(0.0)),
            None => Ok(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn counts(pairs: &[(&str, u64)]) -> AHashMap<String, u64> {
        pairs.iter().map(|(k, c)| (k.to_string(), *c)).collect()
    }

    #[test]
    fn test_table_names() {
        assert_eq!(TableId::Global.table_name(TableKind::Frequency), "freq.global");
        assert_eq!(
            TableId::category("news").table_name(TableKind::Rank),
            "rank.cat.news"
        );
    }

    #[test]
    fn test_increment_and_count() {
        let store = FrequencyStore::open_in_memory().unwrap();
        let news = TableId::category("news");

        assert_eq!(store.count(&news, "the").unwrap(), 0);
        store.increment(&news, "the").unwrap();
        store.increment(&news, "the").unwrap();
        store.increment(&news, "cat").unwrap();

        assert_eq!(store.count(&news, "the").unwrap(), 2);
        assert_eq!(store.count(&news, "cat").unwrap(), 1);
        assert_eq!(store.count(&TableId::Global, "the").unwrap(), 0);
        assert_eq!(store.len(TableKind::Frequency, &news).unwrap(), 2);
    }

    #[test]
    fn test_apply_counts_updates_every_table() {
        let store = FrequencyStore::open_in_memory().unwrap();
        let tables = [TableId::category("a"), TableId::Global];

        store.apply_counts(&tables, &counts(&[("x", 3), ("y", 1)])).unwrap();
        store.apply_counts(&tables, &counts(&[("x", 2)])).unwrap();

        for table in &tables {
            assert_eq!(store.count(table, "x").unwrap(), 5);
            assert_eq!(store.count(table, "y").unwrap(), 1);
        }
    }

    #[test]
    fn test_frequencies_in_key_order() {
        let store = FrequencyStore::open_in_memory().unwrap();
        store
            .apply_counts(&[TableId::Global], &counts(&[("b", 1), ("a", 4), ("c", 2)]))
            .unwrap();

        let entries = store.frequencies(&TableId::Global).unwrap();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), 4),
                ("b".to_string(), 1),
                ("c".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_write_ranks_and_erase() {
        let store = FrequencyStore::open_in_memory().unwrap();
        store
            .apply_counts(&[TableId::Global], &counts(&[("a", 4), ("b", 4), ("c", 1)]))
            .unwrap();

        assert!(!store.has_table(TableKind::Rank, &TableId::Global).unwrap());
        assert_eq!(store.write_ranks(&TableId::Global).unwrap(), 3);
        assert!(store.has_table(TableKind::Rank, &TableId::Global).unwrap());

        let reader = store.rank_reader(&TableId::Global).unwrap();
        assert_eq!(reader.get("a").unwrap(), 1.5);
        assert_eq!(reader.get("c").unwrap(), 3.0);
        assert_eq!(reader.get("zzz").unwrap(), 0.0);

        assert!(store.erase_all(TableKind::Rank, &TableId::Global).unwrap());
        assert!(store.is_empty(TableKind::Rank, &TableId::Global).unwrap());
        assert!(!store.erase_all(TableKind::Rank, &TableId::Global).unwrap());
        // frequencies survive
        assert_eq!(store.count(&TableId::Global, "a").unwrap(), 4);
    }

    #[test]
    fn test_missing_rank_table_reads_zero() {
        let store = FrequencyStore::open_in_memory().unwrap();
        let reader = store.rank_reader(&TableId::category("none")).unwrap();
        assert_eq!(reader.get("x").unwrap(), 0.0);
        assert!(store.ranks(&TableId::category("none")).unwrap().is_empty());
    }

    #[test]
    fn test_persistence_across_reopens() {
        let dir = TempDir::new().unwrap();
        let news = TableId::category("news");

        {
            let store = FrequencyStore::open(dir.path()).unwrap();
            store.apply_counts(&[news.clone()], &counts(&[("k", 7)])).unwrap();
            store.write_ranks(&news).unwrap();
            store.close().unwrap();
        }

        let store = FrequencyStore::open(dir.path()).unwrap();
        assert_eq!(store.count(&news, "k").unwrap(), 7);
        assert_eq!(store.ranks(&news).unwrap(), vec![("k".to_string(), 1.0)]);
        assert_eq!(store.path(), Some(dir.path().join(DATABASE_FILE).as_path()));

        let mut names = store.table_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["freq.cat.news", "generation", "rank.cat.news"]);
    }

    #[test]
    fn test_generations_track_count_changes() {
        let store = FrequencyStore::open_in_memory().unwrap();
        let news = TableId::category("news");
        assert_eq!(store.generations().unwrap(), Generations::default());

        store.apply_counts(&[news.clone()], &counts(&[("k", 2)])).unwrap();
        store.apply_counts(&[news.clone()], &AHashMap::new()).unwrap();
        let generations = store.generations().unwrap();
        assert_eq!(generations.trained, 1);
        assert!(!generations.ranks_current());

        store.write_ranks(&news).unwrap();
        assert_eq!(store.mark_ranked().unwrap(), 1);
        assert!(store.generations().unwrap().ranks_current());

        store.increment(&news, "k").unwrap();
        assert!(!store.generations().unwrap().ranks_current());

        store.mark_ranked().unwrap();
        assert!(store.erase_all(TableKind::Frequency, &news).unwrap());
        assert_eq!(store.generations().unwrap().trained, 3);
        assert!(!store.generations().unwrap().ranks_current());
    }
}
