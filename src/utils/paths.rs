use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Directory name used under the platform data directory
const APP_DIR_NAME: &str = "scm";

/// Platform default storage root
/// - Linux: `~/.local/share/scm`
/// - macOS: `~/Library/Application Support/scm`
/// - Windows: `%LOCALAPPDATA%\scm`
pub fn default_storage_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Failed to get platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Resolve the storage root used by every command.
///
/// An explicit directory must already exist. The default directory is created
/// on first use, owner-only on Unix.
///
/// # Errors
///
/// Returns an error if the explicit directory is missing or not a directory,
/// or if the default directory cannot be determined or created.
pub fn resolve_storage_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            bail!("Storage directory does not exist: {}", dir.display());
        }
        return Ok(dir.to_path_buf());
    }

    let dir = default_storage_dir()?;
    if !dir.exists() {
        create_private_dir(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
    }
    Ok(dir)
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
