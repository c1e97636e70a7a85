//! Owner-only, write-then-rename file creation.
//!
//! Entry files and the line cache both contain clipboard text, so they are
//! created `0o600` and only appear under their final name once fully written.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// Mode applied to every file holding selection text
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Hidden sibling used while `dest` is being written: `.<name>.tmp`
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    dest.with_file_name(format!(".{}.tmp", name))
}

/// Write `contents` to `dest` atomically with owner read/write permissions.
///
/// On failure the temporary file is removed and `dest` is left untouched.
pub fn write_private_atomic(dest: &Path, contents: &[u8]) -> StoreResult<()> {
    let temp = temp_path_for(dest);

    // Leftover from a crash mid-write
    remove_if_exists(&temp).map_err(|e| StoreError::write(&temp, e))?;

    let result = write_new_file(&temp, contents)
        .and_then(|()| restrict_permissions(&temp))
        .and_then(|()| fs::rename(&temp, dest).map_err(|e| StoreError::write(dest, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

/// Remove `path`, treating an already missing file as success.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn write_new_file(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_FILE_MODE);
    }

    let mut file = options.open(path).map_err(|e| StoreError::write(path, e))?;
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|e| StoreError::write(path, e))
}

// The creation mode is filtered through the umask; set it explicitly so a
// permissive umask can never leave the file group- or world-readable.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> StoreResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_FILE_MODE))
        .map_err(|e| StoreError::permission(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> StoreResult<()> {
    Ok(())
}
