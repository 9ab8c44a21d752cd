//! markport - Markdown editor core with live preview and HTML/DOCX export
//!
//! The source text is rendered to an HTML preview (comrak, syntect and
//! MathML for `$...$` math) and exported either as a standalone HTML page or
//! as a Word document built from the Markdown block tokens.
//!
//! # Example
//! ```ignore
//! use markport::editor::EditorState;
//! use markport::export::StyleTable;
//! use markport::preview::PreviewRenderer;
//!
//! let state = EditorState::new("# Title\n\nHello $x^2$ world");
//! let renderer = PreviewRenderer::new();
//! let html = state.preview(&renderer);
//! state.export_docx(&renderer, &StyleTable::default(), "out".as_ref())?;
//! ```

pub mod config;
pub mod docx;
pub mod editor;
pub mod error;
pub mod export;
pub mod markdown;
pub mod preview;

pub use error::{Error, Result};
