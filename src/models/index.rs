use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::EntryId;

/// One `<path>\t<preview>` line of the line cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub path: PathBuf,
    pub preview: String,
}

impl IndexRecord {
    /// Id recovered from the record's file name, if it is an entry file.
    pub fn id(&self) -> Option<EntryId> {
        EntryId::from_path(&self.path)
    }
}
