//! Engine-wide lifecycle state.

use serde::{Deserialize, Serialize};

/// Where the classifier is in its train/finalize cycle.
///
/// ```text
///          train()            finalize()
/// Empty ──────────▶ Training ───────────▶ Finalized
///                      ▲                      │
///                      └──────── train() ─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierState {
    /// Nothing trained yet.
    Empty,
    /// Frequencies changed since the last finalize; rank tables are stale.
    Training,
    /// Rank tables match the frequency tables.
    Finalized,
}

impl ClassifierState {
    /// Whether classification can use the rank tables as they are.
    pub fn is_finalized(self) -> bool {
        self == ClassifierState::Finalized
    }
}

impl std::fmt::Display for ClassifierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClassifierState::Empty => "empty",
            ClassifierState::Training => "training",
            ClassifierState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}
