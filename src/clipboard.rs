//! System clipboard access for copying shell transcripts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
    #[error("nothing to copy")]
    Empty,
}

/// Place `text` on the system clipboard.
pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    if text.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned())?;
    tracing::debug!(bytes = text.len(), "copied to clipboard");
    Ok(())
}
