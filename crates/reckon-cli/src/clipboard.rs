//! Clipboard seam.
//!
//! Export builds the document string in pure code and hands it to a
//! [`ClipboardSink`]; only the sink performs I/O. Tests substitute a
//! recording fake.

use anyhow::{Context, Result};

/// Destination for the exported document.
pub trait ClipboardSink {
    /// Deliver `text` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the host clipboard is unavailable or rejects
    /// the write. Failure never affects the in-memory task list.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// The host system clipboard via `arboard`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("failed to open system clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to write to system clipboard")
    }
}
