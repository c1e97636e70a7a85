//! The `line_cache` index: one `<path>\t<preview>` line per active entry,
//! newest first.
//!
//! External pickers poll this file instead of reading every entry. It is
//! rewritten after each change to the store and replaced atomically, so a
//! reader sees either the previous index or the new one, never a partial file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::LINE_CACHE_FILENAME;
use crate::error::StoreResult;
use crate::models::IndexRecord;
use crate::store::EntryStore;
use crate::utils::atomic::write_private_atomic;

/// Location of the index for a storage root
pub fn index_path(root: &Path) -> PathBuf {
    root.join(LINE_CACHE_FILENAME)
}

/// Render the index for the store's active entries, newest first.
///
/// Entries whose backing file no longer exists are left out: the directory is
/// the source of truth and the in-memory set is only advisory.
pub fn render_index(store: &EntryStore) -> String {
    let mut contents = String::new();

    for entry in store.newest_first() {
        match entry.path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                debug!(id = %entry.id, "skipping vanished entry");
                continue;
            }
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "cannot check entry, skipping");
                continue;
            }
        }

        contents.push_str(&format!("{}\t{}\n", entry.path.display(), entry.preview));
    }

    contents
}

/// Rewrite `<root>/line_cache` from the store's current state.
///
/// # Errors
///
/// Returns [`crate::error::StoreError::WriteFailure`] if the index cannot be
/// written or moved into place. The previous index is left intact in that
/// case.
pub fn write_index(store: &EntryStore) -> StoreResult<PathBuf> {
    let path = index_path(store.root());
    let contents = render_index(store);

    write_private_atomic(&path, contents.as_bytes())?;
    debug!(path = %path.display(), entries = contents.lines().count(), "wrote line cache");

    Ok(path)
}

/// Parse an index file back into records.
///
/// A missing index yields no records. Lines without a tab separator are
/// skipped with a warning.
pub fn read_index(path: &Path) -> Result<Vec<IndexRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read index: {}", path.display()));
        }
    };

    let mut records = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        match line.split_once('\t') {
            Some((entry_path, preview)) => records.push(IndexRecord {
                path: PathBuf::from(entry_path),
                preview: preview.to_string(),
            }),
            None => warn!(line = line_num + 1, "malformed line in {}", path.display()),
        }
    }

    Ok(records)
}
