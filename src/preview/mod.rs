//! One-line previews of entry text.
//!
//! A preview is the first line of an entry, cut to the configured width, with a
//! suffix telling how many lines the entry spans:
//!
//! ```
//! use scm::preview::build_preview;
//!
//! let preview = build_preview("a\nb\nc", 80);
//! assert_eq!(preview.line, "a (3 lines)");
//! assert_eq!(preview.line_count, 2);
//! ```
//!
//! Previews are used both for display in the line cache and for duplicate
//! detection in [`crate::store::EntryStore::insert`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::PREVIEW_SUFFIX_BUDGET;

/// Appended when a single-line text is cut short
pub const TRUNCATION_MARKER: &str = " ..";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Preview {
    pub line: String,
    /// Number of `\n` characters in the source text
    pub line_count: usize,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Build the preview of `text` for a total preview width of `width`.
///
/// The first line keeps at most `width - PREVIEW_SUFFIX_BUDGET` characters
/// (Unicode scalar values, so multi-byte text is never split). Multi-line text
/// gets a `" (N lines)"` suffix where N counts physical lines; an over-long
/// single line gets `" .."` instead.
pub fn build_preview(text: &str, width: usize) -> Preview {
    let line_count = text.bytes().filter(|&b| b == b'\n').count();
    let first_line = first_line(text);
    let max_chars = width.saturating_sub(PREVIEW_SUFFIX_BUDGET);

    let mut line: String = first_line.chars().take(max_chars).collect();
    if line_count > 0 {
        line.push_str(&format!(" ({} lines)", line_count + 1));
    } else if first_line.chars().count() > max_chars {
        line.push_str(TRUNCATION_MARKER);
    }

    Preview { line, line_count }
}

/// Read a stored entry and build its preview.
///
/// Invalid UTF-8 is decoded lossily. A missing file is reported as
/// [`io::ErrorKind::NotFound`] so callers can treat it as already evicted.
pub fn preview_file(path: &Path, width: usize) -> io::Result<Preview> {
    let bytes = fs::read(path)?;
    Ok(build_preview(&String::from_utf8_lossy(&bytes), width))
}

fn first_line(text: &str) -> &str {
    let line = text.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line)
}
