//! Saving and clipboard delivery of recorded macros.

use crate::{AppError, AppResult, atomic_file::write_atomically};

use std::{panic::Location, path::Path};

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Writes finished recordings to disk and optionally to the clipboard.
///
/// The clipboard is opened on first use so headless sessions can still save
/// macros when clipboard copying is disabled.
#[derive(Default)]
pub struct OutputHandler {
    pub(crate) clipboard: Option<Clipboard>,
}

impl OutputHandler {
    /// Create a new output handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `text` to `path` and, when `copy_to_clipboard` is set, copy it.
    ///
    /// The file is always written first. A clipboard failure is returned
    /// after the file is safely on disk.
    #[track_caller]
    #[instrument(skip(self, text))]
    pub fn output_macro(
        &mut self,
        text: &str,
        path: &Path,
        copy_to_clipboard: bool,
    ) -> AppResult<()> {
        write_atomically(path, text)?;
        debug!(macro_path = ?path, text_len = text.len(), "Macro saved");

        if copy_to_clipboard {
            if let Err(e) = self.copy_to_clipboard(text) {
                warn!(error = ?e, "Clipboard copy failed, macro is saved to disk");
                return Err(e);
            }
        }

        info!(
            macro_path = ?path,
            line_count = text.lines().count(),
            copied = copy_to_clipboard,
            "Macro output complete"
        );

        Ok(())
    }

    /// Put `text` on the system clipboard.
    #[track_caller]
    #[instrument(skip(self, text))]
    pub fn copy_to_clipboard(&mut self, text: &str) -> AppResult<()> {
        let clipboard = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard,
            None => {
                let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
                    reason: format!("Failed to initialize clipboard: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                self.clipboard.insert(clipboard)
            }
        };

        clipboard
            .set_text(text)
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(text_len = text.len(), "Macro copied to clipboard");

        Ok(())
    }
}
