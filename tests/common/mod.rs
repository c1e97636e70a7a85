//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use scm::config::StoreConfig;
use scm::models::EntryId;
use scm::store::{Clock, EntryStore};
use tempfile::TempDir;

/// Builder for creating test storage directories
pub struct StorageDirBuilder {
    temp_dir: TempDir,
}

impl StorageDirBuilder {
    /// Create a new builder with an empty storage directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the storage directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add an entry file `E<secs>` with the given content
    pub fn with_entry(self, secs: i64, content: &str) -> Self {
        let path = self.temp_dir.path().join(EntryId::new(secs).file_name());
        fs::write(path, content).expect("Failed to write entry file");
        self
    }

    /// Add an arbitrary file
    pub fn with_file(self, name: &str, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for StorageDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock that advances one second per call
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<i64>,
}

impl SteppingClock {
    pub fn starting_at(secs: i64) -> Self {
        Self { next: Cell::new(secs) }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> EntryId {
        let secs = self.next.get();
        self.next.set(secs + 1);
        EntryId::new(secs)
    }
}

/// Clock stuck on one second, for same-second insertions
#[derive(Debug)]
pub struct FrozenClock(pub i64);

impl Clock for FrozenClock {
    fn now(&self) -> EntryId {
        EntryId::new(self.0)
    }
}

/// Open and scan a store whose ids start at `start` and step by one
pub fn stepping_store(dir: &Path, config: StoreConfig, start: i64) -> EntryStore {
    let mut store = EntryStore::with_clock(dir, config, SteppingClock::starting_at(start))
        .expect("Failed to open store");
    store.scan().expect("Failed to scan store");
    store
}

/// Previews of the active entries, oldest first
pub fn previews(store: &EntryStore) -> Vec<String> {
    store.entries().iter().map(|e| e.preview.line.clone()).collect()
}

/// Lines of the line cache file
pub fn index_lines(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join("line_cache"))
        .expect("Failed to read line cache")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Entry files currently on disk, sorted by name
pub fn entry_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = fs::read_dir(root)
        .expect("Failed to read storage dir")
        .flatten()
        .map(|e| e.path())
        .filter(|p| EntryId::from_path(p).is_some())
        .collect();
    files.sort();
    files
}
