use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::preview::Preview;

/// Prefix of every entry file name in the storage directory
pub const ENTRY_FILE_PREFIX: char = 'E';

/// Identifier of an entry: Unix seconds at creation time.
///
/// The id is also the sort key and the suffix of the backing file name
/// (`E<id>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(i64);

impl EntryId {
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> i64 {
        self.0
    }

    pub fn file_name(self) -> String {
        format!("{}{}", ENTRY_FILE_PREFIX, self.0)
    }

    /// Parse a storage file name of the exact form `E<decimal digits>`.
    ///
    /// ```
    /// use scm::models::EntryId;
    ///
    /// assert_eq!(EntryId::from_file_name("E1700000000"), Some(EntryId::new(1700000000)));
    /// assert_eq!(EntryId::from_file_name("E12.tmp"), None);
    /// assert_eq!(EntryId::from_file_name("line_cache"), None);
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix(ENTRY_FILE_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name().and_then(|name| name.to_str()).and_then(Self::from_file_name)
    }

    pub fn created_at(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored selection. The content lives in the file at `path`; only the
/// preview is kept in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub path: PathBuf,
    pub preview: Preview,
}
