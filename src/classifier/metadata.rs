//! Persisted classifier metadata.
//!
//! Stored as `meta.json` next to the frequency database and rewritten
//! atomically whenever a new category appears, after `finalize()` and on
//! `close()`. Whether the rank tables are current is tracked by the database
//! itself; see [`crate::frequency::Generations`].

use serde::{Deserialize, Serialize};

use crate::error::{GenreError, Result};
use crate::storage::{Storage, read_all, write_atomic};

/// File name of the metadata record inside a data directory.
pub const METADATA_FILE: &str = "meta.json";
/// Format version written to and expected from [`METADATA_FILE`].
pub const METADATA_VERSION: u32 = 1;

/// Settings and category list of a persisted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: u32,
    pub stem: bool,
    /// Normalized n-gram orders.
    pub orders: Vec<usize>,
    /// Cleaned stoplist, sorted.
    #[serde(default)]
    pub stoplist: Vec<String>,
    /// Category names in the order they were first trained.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Metadata {
    /// Fresh record with no categories.
    pub fn new(stem: bool, orders: Vec<usize>, stoplist: Vec<String>) -> Self {
        Metadata {
            version: METADATA_VERSION,
            stem,
            orders,
            stoplist,
            categories: Vec::new(),
        }
    }

    /// Load metadata from `storage`, `None` when none was written yet.
    ///
    /// A record that cannot be decoded is a storage error.
    pub fn load(storage: &dyn Storage) -> Result<Option<Self>> {
        if !storage.file_exists(METADATA_FILE) {
            return Ok(None);
        }

        let buffer = read_all(storage, METADATA_FILE)?;
        if buffer.is_empty() {
            return Ok(None);
        }

        let metadata: Metadata = serde_json::from_slice(&buffer)
            .map_err(|e| GenreError::storage(format!("corrupt {METADATA_FILE}: {e}")))?;
        if metadata.version != METADATA_VERSION {
            return Err(GenreError::invalid_config(format!(
                "metadata version mismatch: expected {}, found {}",
                METADATA_VERSION, metadata.version
            )));
        }
        Ok(Some(metadata))
    }

    /// Write the record atomically.
    pub fn save(&self, storage: &dyn Storage) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(self)?;
        write_atomic(storage, METADATA_FILE, &serialized)
    }

    /// Whether `category` has been trained.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}
