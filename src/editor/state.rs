//! Editor state
//!
//! The Markdown source is the single source of truth; previews and exports
//! are derived from it on demand. The only other state is the transient
//! "saved" confirmation shown after an HTML export, which expires on its own.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::debug;

use crate::config::Settings;
use crate::error::Result;
use crate::export::{self, StyleTable};
use crate::preview::PreviewRenderer;

/// Sample document the editor starts with.
pub const DEFAULT_CONTENT: &str = r#"# Online Markdown Converter

A simple Markdown editor with live preview and export to HTML and Word.

## How to use

1. Type Markdown in the editor
2. The preview updates as you type
3. Copy the converted HTML or export a file

## Publishing an article

1. Finish editing, then save as HTML
2. Open the saved page and select everything
3. Copy it and paste into your publishing platform

## What is supported

Inline math such as $e^{i\pi} + 1 = 0$ and display math:

$$\sum_{k=1}^{n} k = \frac{n(n+1)}{2}$$

```python
def greet(name):
    return f"Hello, {name}!"
```

> Tables, quotes and links work too.

| Feature | Preview | Word |
|:--------|:-------:|-----:|
| Math    | yes     | text |
| Code    | yes     | yes  |

Start writing your first Markdown document!
"#;

// ─────────────────────────────────────────────────────────────────────────────
// EditorState
// ─────────────────────────────────────────────────────────────────────────────

/// Source text plus the save confirmation flag.
#[derive(Debug, Clone)]
pub struct EditorState {
    source: String,
    saved_at: Option<Instant>,
    confirmation: Duration,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT)
    }
}

impl EditorState {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            saved_at: None,
            confirmation: Duration::from_millis(Settings::DEFAULT_SAVE_CONFIRMATION_MS),
        }
    }

    /// State using the confirmation delay from settings.
    pub fn from_settings(source: impl Into<String>, settings: &Settings) -> Self {
        Self::new(source).with_confirmation(Duration::from_millis(settings.save_confirmation_ms))
    }

    pub fn with_confirmation(mut self, confirmation: Duration) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the whole source text.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Render the current source.
    pub fn preview(&self, renderer: &PreviewRenderer) -> String {
        renderer.render(&self.source)
    }

    /// Export `markdown-preview.html` and raise the save confirmation.
    pub fn save_html(
        &mut self,
        renderer: &PreviewRenderer,
        title: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let path = export::export_to_html_file(renderer, &self.source, title, output_dir)?;
        self.mark_saved(Instant::now());
        Ok(path)
    }

    /// Export `document.docx`.
    pub fn export_docx(
        &self,
        renderer: &PreviewRenderer,
        styles: &StyleTable,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        export::export_docx(&self.source, renderer.options(), styles, output_dir)
    }

    /// Copy the rendered HTML to the system clipboard.
    pub fn copy_html(&self, renderer: &PreviewRenderer) -> Result<()> {
        export::copy_html_to_clipboard(renderer, &self.source)
    }

    pub fn mark_saved(&mut self, now: Instant) {
        debug!("Save confirmation raised for {:?}", self.confirmation);
        self.saved_at = Some(now);
    }

    /// Whether the save confirmation is still showing at `now`.
    pub fn is_saved(&self, now: Instant) -> bool {
        self.saved_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.confirmation)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
