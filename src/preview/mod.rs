//! Live preview module for markport
//!
//! This module turns the editor's Markdown source into displayable HTML,
//! with inline math rendered and fenced code highlighted.

mod renderer;

pub use renderer::PreviewRenderer;

pub(crate) use renderer::html_escape;
