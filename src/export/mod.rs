//! Document export
//!
//! # Supported Export Formats
//!
//! - **HTML File**: the preview wrapped in a standalone page,
//!   `markdown-preview.html`
//! - **Word Document**: blocks mapped to a `.docx`, `document.docx`
//! - **Clipboard HTML**: rendered HTML copied for pasting in other apps
//!
//! # Architecture
//!
//! - `options.rs` - export formats and their file names
//! - `styles.rs` - fonts, sizes and colors used by the document mapper
//! - `document.rs` - token to document mapping and DOCX export
//! - `html.rs` - HTML page generation
//! - `clipboard.rs` - platform clipboard operations

pub mod clipboard;
pub mod document;
pub mod html;
pub mod options;
pub mod styles;

pub use clipboard::copy_html_to_clipboard;
pub use document::{build_document, export_docx, map_token, markdown_to_docx};
pub use html::{export_to_html_file, generate_html_document};
pub use options::ExportFormat;
pub use styles::StyleTable;
