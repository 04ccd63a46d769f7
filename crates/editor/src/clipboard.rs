//! Clipboard sinks for the previewed image's data URI.

use std::fmt;

use facesnap_common::error::{FaceSnapError, FaceSnapResult};

/// Destination for copied text.
pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> FaceSnapResult<()>;
}

/// The desktop clipboard (X11, Wayland, macOS or Windows).
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the platform clipboard.
    ///
    /// Fails with `Platform` when no clipboard is reachable, e.g. on a
    /// headless machine.
    pub fn open() -> FaceSnapResult<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| FaceSnapError::platform(format!("Clipboard unavailable: {e}")))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> FaceSnapResult<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| FaceSnapError::platform(format!("Failed to copy to clipboard: {e}")))?;
        tracing::info!(bytes = text.len(), "Copied to clipboard");
        Ok(())
    }
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

/// In-memory clipboard, mostly for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> FaceSnapResult<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
