//! Store configuration and the constants shared by the store and the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default maximum number of entries kept in the history
pub const DEFAULT_CAPACITY: usize = 10;

/// Default total width of a preview line, suffix included
pub const DEFAULT_PREVIEW_WIDTH: usize = 80;

/// Characters of the preview width reserved for the " (N lines)" / " .." suffix
pub const PREVIEW_SUFFIX_BUDGET: usize = 15;

/// Texts shorter than this (in bytes) are not worth keeping
pub const MIN_ENTRY_LEN: usize = 2;

/// Name of the consolidated preview index at the storage root
pub const LINE_CACHE_FILENAME: &str = "line_cache";

/// Name of the advisory lock file at the storage root
pub const LOCK_FILENAME: &str = "lock";

/// How incoming text is compared against existing entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Compare first-line previews only. Two texts sharing a first line are
    /// treated as duplicates even when the rest differs.
    #[default]
    Preview,
    /// Compare the full stored contents.
    Content,
}

/// Knobs injected into [`crate::store::EntryStore`] by the CLI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub capacity: usize,
    /// Keep evicted files on disk, only dropping them from the active set
    pub retain_on_evict: bool,
    pub preview_width: usize,
    pub dedup: DedupMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            retain_on_evict: false,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            dedup: DedupMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, ..Self::default() }
    }
}
