//! The watch loop: poll the selection source, store new text, republish the
//! line cache.
//!
//! # Error Handling Strategy
//!
//! - **Selection read failures** are logged and the loop moves on to the next
//!   poll; a clipboard owner disappearing mid-transfer should not stop the
//!   history.
//! - **Store failures** (`StoreError`) end the loop and are returned to the
//!   caller, which exits the process. Each cycle leaves the directory in a
//!   consistent state, so nothing needs to be rolled back.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clipboard::SelectionSource;
use crate::line_cache::write_index;
use crate::store::{EntryStore, InsertOutcome};

/// Delay between two clipboard polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonOptions {
    pub poll_interval: Duration,
    /// Process a single poll and return
    pub oneshot: bool,
}

impl Default for DaemonOptions {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, oneshot: false }
    }
}

pub struct Daemon<S> {
    store: EntryStore,
    source: S,
    options: DaemonOptions,
}

impl<S: SelectionSource> Daemon<S> {
    pub fn new(store: EntryStore, source: S, options: DaemonOptions) -> Self {
        Self { store, source, options }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Reload entries from disk (evicting any excess) and rewrite the index.
    pub fn refresh(&mut self) -> Result<()> {
        self.store.scan().context("Failed to scan storage directory")?;
        write_index(&self.store).context("Failed to write line cache")?;
        Ok(())
    }

    /// Fetch one selection and store it.
    ///
    /// The directory is rescanned before every insert, so entries deleted by
    /// other processes free their slot and no longer count as duplicates.
    /// Returns `None` when there was nothing new to store. The index is
    /// rewritten only when an entry was stored.
    pub fn poll_once(&mut self) -> Result<Option<InsertOutcome>> {
        let text = match self.source.fetch_selection_text() {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Failed to read selection: {:#}", e);
                return Ok(None);
            }
        };

        self.store.scan().context("Failed to scan storage directory")?;
        let outcome = self.store.insert(&text).context("Failed to store selection")?;
        if outcome.is_stored() {
            write_index(&self.store).context("Failed to write line cache")?;
        }

        Ok(Some(outcome))
    }

    /// Run until a store error occurs, or after one poll in oneshot mode.
    pub fn run(&mut self) -> Result<()> {
        self.refresh()?;
        info!(
            root = %self.store.root().display(),
            entries = self.store.len(),
            capacity = self.store.capacity(),
            "watching selections"
        );

        loop {
            self.poll_once()?;
            if self.options.oneshot {
                return Ok(());
            }
            thread::sleep(self.options.poll_interval);
        }
    }
}
