//! Clipboard Operations for HTML Export
//!
//! Puts rendered HTML on the system clipboard through arboard, with the
//! Markdown source as the plain-text alternative. Apps that understand rich
//! clipboard content (mail clients, word processors, web editors) paste the
//! formatted version.

use arboard::Clipboard;
use log::info;

use super::html::generate_html_fragment;
use crate::error::{Error, Result};
use crate::preview::PreviewRenderer;

/// Render `markdown` and copy the HTML to the clipboard.
pub fn copy_html_to_clipboard(renderer: &PreviewRenderer, markdown: &str) -> Result<()> {
    let html = generate_html_fragment(renderer, markdown);
    copy_html_with_fallback(&html, markdown)?;
    info!("Copied {} bytes of HTML to the clipboard", html.len());
    Ok(())
}

/// Copy HTML with a plain text fallback.
pub fn copy_html_with_fallback(html: &str, plain_text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| Error::Clipboard(format!("unavailable: {}", e)))?;
    clipboard.set_html(html, Some(plain_text))?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err: Error = arboard::Error::ContentNotAvailable.into();
        assert!(err.to_string().contains("Clipboard"));
    }
}
