//! Markdown parsing, lexing, math and syntax highlighting
//!
//! Parsing is delegated to comrak (CommonMark + GFM). On top of it this module
//! provides:
//! - shared parse options so preview and export agree on the dialect
//! - a flat block token stream for the document exporter
//! - `$...$` / `$$...$$` math segmentation and rendering
//! - syntect highlighting for fenced code
//!
//! # Example
//! ```ignore
//! use markport::markdown::{lex, MarkdownOptions, Token};
//!
//! let tokens = lex("# Title\n\nHello $x^2$", &MarkdownOptions::default());
//! assert!(matches!(tokens[0], Token::Heading { depth: 1, .. }));
//! ```

pub mod lexer;
pub mod math;
mod parser;
pub mod syntax;

pub use lexer::{lex, ListItem, Token};
pub use math::{split_math, MathMlRenderer, MathRenderer, MathResult, MathSegment};
pub use parser::{MarkdownOptions, TableAlignment};

pub(crate) use parser::parse;
