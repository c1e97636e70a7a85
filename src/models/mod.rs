//! Data models for the selection history.
//!
//! - [`EntryId`] - Wall-clock identifier that names an entry's backing file
//! - [`Entry`] - One stored selection with its derived preview
//! - [`IndexRecord`] - One line of the `line_cache` index as read back from disk

pub mod entry;
pub mod index;

pub use entry::{Entry, EntryId};
pub use index::IndexRecord;
