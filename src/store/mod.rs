//! Bounded, file-backed entry store.
//!
//! Each entry lives in its own file `E<id>` under the storage root. The store
//! keeps the active entries in memory, sorted by ascending id, and never holds
//! more than the configured capacity:
//!
//! - [`EntryStore::scan`] rebuilds the active set from the directory, evicting
//!   the oldest files when there are too many
//! - [`EntryStore::insert`] persists new text, rejecting short, duplicate and
//!   same-second input, then evicts the oldest entry if the bound is exceeded
//!
//! In retain mode evicted files stay on disk and are only dropped from the
//! active set.
//!
//! The store assumes its caller holds the storage lock
//! ([`crate::utils::lock::StorageLock`]) and performs no locking itself.

pub mod clock;

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use clock::{Clock, SystemClock};

use crate::config::{DedupMode, MIN_ENTRY_LEN, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::models::{Entry, EntryId};
use crate::preview::{Preview, build_preview, preview_file};
use crate::utils::atomic::{remove_if_exists, write_private_atomic};

/// Why [`EntryStore::insert`] declined a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Shorter than [`MIN_ENTRY_LEN`] bytes
    TooShort,
    /// Matches the existing entry `of`
    Duplicate { of: EntryId },
    /// An entry with this id already exists (same-second insertion)
    Collision { id: EntryId },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "text shorter than {} bytes", MIN_ENTRY_LEN),
            Self::Duplicate { of } => write!(f, "duplicate of entry {}", of),
            Self::Collision { id } => write!(f, "entry {} already exists", id),
        }
    }
}

/// Result of a successful call to [`EntryStore::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Stored(Entry),
    Rejected(RejectReason),
}

impl InsertOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Stored(entry) => Some(entry),
            Self::Rejected(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct EntryStore {
    root: PathBuf,
    config: StoreConfig,
    /// Active entries, strictly ascending by id
    entries: Vec<Entry>,
    clock: Box<dyn Clock>,
}

impl EntryStore {
    /// Open the store rooted at `root` using wall-clock ids.
    ///
    /// The root is canonicalized so index records carry absolute paths. The
    /// directory is not scanned; call [`EntryStore::scan`] to load entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] if `root` does not exist or
    /// is not a directory.
    pub fn open(root: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        Self::with_clock(root, config, SystemClock)
    }

    /// Open the store with a custom id source.
    pub fn with_clock(
        root: impl AsRef<Path>,
        config: StoreConfig,
        clock: impl Clock + 'static,
    ) -> StoreResult<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).map_err(|e| StoreError::unavailable(root, e))?;
        if !root.is_dir() {
            return Err(StoreError::unavailable(
                &root,
                io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }

        Ok(Self { root, config, entries: Vec::new(), clock: Box::new(clock) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Active entries, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok().map(|i| &self.entries[i])
    }

    /// Path of the backing file for `id`, whether or not it exists.
    pub fn entry_path(&self, id: EntryId) -> PathBuf {
        self.root.join(id.file_name())
    }

    /// Rebuild the active set from the storage directory.
    ///
    /// Files named exactly `E<digits>` are entries; everything else is
    /// ignored. When more than `capacity` entries are found, the oldest are
    /// evicted. Entries whose file disappears before its preview is read are
    /// skipped.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StorageUnavailable`] if the directory or an entry file
    ///   cannot be read
    /// - [`StoreError::WriteFailure`] if an evicted file cannot be removed
    pub fn scan(&mut self) -> StoreResult<()> {
        let ids = self.list_entry_ids()?;
        let excess = ids.len().saturating_sub(self.config.capacity);

        let mut ids = ids.into_iter();
        for id in ids.by_ref().take(excess) {
            self.evict_file(id)?;
        }

        let mut entries = Vec::with_capacity(self.config.capacity.min(ids.len()));
        for id in ids {
            let path = self.entry_path(id);
            match preview_file(&path, self.config.preview_width) {
                Ok(preview) => entries.push(Entry { id, path, preview }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(id = %id, "entry vanished during scan");
                }
                Err(e) => return Err(StoreError::unavailable(path, e)),
            }
        }

        self.entries = entries;
        debug!(entries = self.entries.len(), evicted = excess, "scanned storage");
        Ok(())
    }

    /// Persist `text` as a new entry.
    ///
    /// Rejections (too short, duplicate, same-second collision) have no side
    /// effects. On acceptance the file is fully written and restricted to the
    /// owner before it appears under its `E<id>` name; if that leaves the store
    /// over capacity, the oldest entry is evicted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::WriteFailure`] if the entry file cannot be written or an
    ///   evicted file cannot be removed
    /// - [`StoreError::PermissionFailure`] if the new file cannot be made
    ///   owner-only
    /// - [`StoreError::StorageUnavailable`] if existing entries cannot be read
    ///   for content deduplication
    pub fn insert(&mut self, text: &str) -> StoreResult<InsertOutcome> {
        if text.len() < MIN_ENTRY_LEN {
            return Ok(self.reject(RejectReason::TooShort));
        }

        let preview = build_preview(text, self.config.preview_width);
        if let Some(of) = self.find_duplicate(text, &preview)? {
            return Ok(self.reject(RejectReason::Duplicate { of }));
        }

        let id = self.clock.now();
        let path = self.entry_path(id);
        if self.get(id).is_some() || self.file_exists(&path)? {
            return Ok(self.reject(RejectReason::Collision { id }));
        }

        write_private_atomic(&path, text.as_bytes())?;

        let entry = Entry { id, path, preview };
        let position = self.entries.partition_point(|e| e.id < id);
        self.entries.insert(position, entry.clone());
        info!(id = %id, "stored entry");
        debug!(preview = %entry.preview, "stored preview");

        self.enforce_capacity()?;
        Ok(InsertOutcome::Stored(entry))
    }

    fn reject(&self, reason: RejectReason) -> InsertOutcome {
        debug!(%reason, "rejected selection");
        InsertOutcome::Rejected(reason)
    }

    fn find_duplicate(&self, text: &str, preview: &Preview) -> StoreResult<Option<EntryId>> {
        match self.config.dedup {
            DedupMode::Preview => {
                Ok(self.entries.iter().find(|e| e.preview == *preview).map(|e| e.id))
            }
            DedupMode::Content => {
                for entry in &self.entries {
                    match fs::read(&entry.path) {
                        Ok(contents) if contents == text.as_bytes() => return Ok(Some(entry.id)),
                        Ok(_) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(StoreError::unavailable(&entry.path, e)),
                    }
                }
                Ok(None)
            }
        }
    }

    // Also catches files excluded from the active set by retain mode, which
    // must not be overwritten.
    fn file_exists(&self, path: &Path) -> StoreResult<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::unavailable(path, e)),
        }
    }

    fn enforce_capacity(&mut self) -> StoreResult<()> {
        while self.entries.len() > self.config.capacity {
            let oldest = self.entries.remove(0);
            self.evict_file(oldest.id)?;
        }
        Ok(())
    }

    fn evict_file(&self, id: EntryId) -> StoreResult<()> {
        if self.config.retain_on_evict {
            debug!(id = %id, "excluded entry from index, file retained");
            return Ok(());
        }

        let path = self.entry_path(id);
        remove_if_exists(&path).map_err(|e| StoreError::write(&path, e))?;
        debug!(id = %id, "evicted entry");
        Ok(())
    }

    fn list_entry_ids(&self) -> StoreResult<BTreeSet<EntryId>> {
        let dir = fs::read_dir(&self.root).map_err(|e| StoreError::unavailable(&self.root, e))?;

        let mut ids = BTreeSet::new();
        for dent in dir {
            let dent = dent.map_err(|e| StoreError::unavailable(&self.root, e))?;
            let Some(id) = dent.file_name().to_str().and_then(EntryId::from_file_name) else {
                continue;
            };

            match dent.file_type() {
                Ok(file_type) if file_type.is_file() => {
                    ids.insert(id);
                }
                Ok(_) => {
                    warn!(path = %dent.path().display(), "skipping entry name that is not a regular file");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::unavailable(dent.path(), e)),
            }
        }

        Ok(ids)
    }
}
