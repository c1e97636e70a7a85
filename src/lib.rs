//! scm - a bounded, file-backed history of clipboard selections
//!
//! A daemon watches the clipboard and stores each distinct text selection as
//! its own file in a storage directory. The history is capped at a fixed
//! number of entries, evicting the oldest first, and a consolidated preview
//! index (`line_cache`) is rewritten after every change for pickers such as
//! dmenu or fzf to read.
//!
//! - [`store::EntryStore`] discovers, deduplicates, inserts and evicts entries
//! - [`preview::build_preview`] derives the one-line preview of an entry
//! - [`line_cache::write_index`] publishes the newest-first index
//! - [`daemon::Daemon`] ties a [`clipboard::SelectionSource`] to the store
//!
//! # Example
//!
//! ```no_run
//! use scm::config::StoreConfig;
//! use scm::line_cache::write_index;
//! use scm::store::EntryStore;
//!
//! let mut store = EntryStore::open("/home/alice/.local/share/scm", StoreConfig::default())?;
//! store.scan()?;
//! store.insert("copied text")?;
//! write_index(&store)?;
//! # Ok::<(), scm::error::StoreError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod daemon;
pub mod error;
pub mod line_cache;
pub mod models;
pub mod preview;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::StoreError;
pub use line_cache::write_index;
pub use models::{Entry, EntryId};
pub use preview::build_preview;
pub use store::{EntryStore, InsertOutcome, RejectReason};
