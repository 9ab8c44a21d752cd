//! Word-processor documents
//!
//! [`model`] holds the document tree the exporter builds, [`writer`]
//! serializes it as a `.docx` package and [`reader`] reads paragraphs back.

pub mod model;
pub mod reader;
pub mod writer;

pub use model::{
    inches_to_twip, Alignment, Block, Border, Document, DocumentStyles, HeadingLevel, Hyperlink,
    Inline, PageMargins, Paragraph, ParagraphBorders, ParagraphStyle, Section, Shading, Spacing,
    TabStop, Table, TableCell, TableRow, TextRun, TWIPS_PER_INCH,
};
pub use reader::{read_outline, read_paragraphs, OutlineEntry, ReadParagraph};
pub use writer::{to_bytes, write_docx};
