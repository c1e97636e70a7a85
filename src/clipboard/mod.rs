use std::io::Read;

use anyhow::{Context, Result, bail};
use arboard::Clipboard;
use clap::ValueEnum;
use tracing::warn;

/// Maximum selection size (10MB); larger selections are not recorded
pub const MAX_SELECTION_BYTES: usize = 10 * 1024 * 1024;

/// Supplies newly selected text to the daemon loop.
pub trait SelectionSource {
    /// Return the selection if it is text and has not been returned before,
    /// `None` otherwise.
    fn fetch_selection_text(&mut self) -> Result<Option<String>>;
}

/// Which system selection to watch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SelectionKind {
    /// The regular copy/paste clipboard
    #[default]
    Clipboard,
    /// The X11/Wayland primary selection (highlighted text)
    Primary,
}

/// Trait for clipboard reads (allows mocking in tests)
trait ClipboardProvider {
    /// `Ok(None)` when the clipboard holds no text
    fn get_text(&mut self, kind: SelectionKind) -> Result<Option<String>>;
}

/// Real clipboard implementation using arboard
struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }

    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    ))]
    fn read(&mut self, kind: SelectionKind) -> Result<String, arboard::Error> {
        use arboard::{GetExtLinux, LinuxClipboardKind};

        match kind {
            SelectionKind::Clipboard => self.clipboard.get_text(),
            SelectionKind::Primary => {
                self.clipboard.get().clipboard(LinuxClipboardKind::Primary).text()
            }
        }
    }

    #[cfg(not(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    )))]
    fn read(&mut self, _kind: SelectionKind) -> Result<String, arboard::Error> {
        self.clipboard.get_text()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn get_text(&mut self, kind: SelectionKind) -> Result<Option<String>> {
        match self.read(kind) {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e).context("Failed to read clipboard contents"),
        }
    }
}

/// Polls the system clipboard and reports each change of text once.
pub struct ClipboardWatcher {
    provider: Box<dyn ClipboardProvider>,
    kind: SelectionKind,
    last_seen: Option<String>,
}

impl ClipboardWatcher {
    /// Connect to the system clipboard.
    ///
    /// # Errors
    /// Returns error if the clipboard is unavailable (headless environment,
    /// no display server).
    pub fn new(kind: SelectionKind) -> Result<Self> {
        if kind == SelectionKind::Primary && !primary_supported() {
            warn!("primary selection is not available on this platform, watching the clipboard");
        }
        Ok(Self::with_provider(Box::new(SystemClipboard::new()?), kind))
    }

    fn with_provider(provider: Box<dyn ClipboardProvider>, kind: SelectionKind) -> Self {
        Self { provider, kind, last_seen: None }
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }
}

impl SelectionSource for ClipboardWatcher {
    fn fetch_selection_text(&mut self) -> Result<Option<String>> {
        let Some(text) = self.provider.get_text(self.kind)? else {
            return Ok(None);
        };
        if text.is_empty() || self.last_seen.as_deref() == Some(text.as_str()) {
            return Ok(None);
        }

        if text.len() > MAX_SELECTION_BYTES {
            warn!(
                "Selection too large to record ({} bytes, max {})",
                text.len(),
                MAX_SELECTION_BYTES
            );
            // Remembered so it is reported only once
            self.last_seen = Some(text);
            return Ok(None);
        }

        self.last_seen = Some(text.clone());
        Ok(Some(text))
    }
}

fn primary_supported() -> bool {
    cfg!(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))
}

/// Yields everything readable from `reader` once, then nothing.
///
/// Backs `scm add`, which stores text piped on stdin.
pub struct ReaderSource<R> {
    reader: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: Some(reader) }
    }
}

impl<R: Read> SelectionSource for ReaderSource<R> {
    fn fetch_selection_text(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.reader.take() else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        reader
            .take(MAX_SELECTION_BYTES as u64 + 1)
            .read_to_end(&mut bytes)
            .context("Failed to read input")?;

        if bytes.len() > MAX_SELECTION_BYTES {
            bail!("Input too large (more than {} bytes)", MAX_SELECTION_BYTES);
        }

        let text = String::from_utf8(bytes).context("Input is not valid UTF-8")?;
        Ok(Some(text))
    }
}
