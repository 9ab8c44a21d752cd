//! comrak configuration and AST helpers
//!
//! Both the preview pipeline and the token lexer parse through here so the
//! two paths always agree on which Markdown extensions are active.

use comrak::{
    nodes::{AstNode, NodeValue, Sourcepos, TableAlignment as ComrakTableAlignment},
    Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Render soft line breaks as `<br>`
    pub hard_breaks: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: false,
            hard_breaks: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    pub(crate) fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;

        // Render options
        options.render.hardbreaks = self.hard_breaks;
        // Raw HTML passes through, as do the math and highlight fragments the
        // preview splices into the tree
        options.render.unsafe_ = true;

        options
    }
}

/// Parse markdown into a comrak arena.
pub(crate) fn parse<'a>(
    arena: &'a Arena<AstNode<'a>>,
    markdown: &str,
    options: &MarkdownOptions,
) -> &'a AstNode<'a> {
    comrak::parse_document(arena, markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Table Alignment
// ─────────────────────────────────────────────────────────────────────────────

/// Table column alignment as declared by the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Plain text of an inline subtree (emphasis markers and link syntax dropped).
pub(crate) fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect_inline_text(node, &mut text);
    text
}

fn collect_inline_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => output.push_str(t),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak => output.push(' '),
        NodeValue::LineBreak => output.push('\n'),
        _ => {}
    }
    for child in node.children() {
        collect_inline_text(child, output);
    }
}

/// Plain text of a container block, one line per child block.
pub(crate) fn block_text<'a>(node: &'a AstNode<'a>) -> String {
    node.children()
        .map(|child| {
            let is_container = matches!(
                child.data.borrow().value,
                NodeValue::List(_)
                    | NodeValue::Item(_)
                    | NodeValue::BlockQuote
                    | NodeValue::TaskItem(_)
            );
            if is_container {
                block_text(child)
            } else if let NodeValue::CodeBlock(code) = &child.data.borrow().value {
                code.literal.trim_end_matches('\n').to_string()
            } else {
                inline_text(child)
            }
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exact source text covered by `pos`, trailing whitespace removed.
///
/// comrak columns are 1-based byte offsets with an inclusive end.
pub(crate) fn source_slice(source: &str, pos: Sourcepos) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let first = pos.start.line;
    if first == 0 || first > lines.len() {
        return String::new();
    }
    let last = pos.end.line.clamp(first, lines.len());

    let mut slice = Vec::with_capacity(last - first + 1);
    for line_no in first..=last {
        let line = lines[line_no - 1];
        let from = if line_no == first {
            floor_boundary(line, pos.start.column.saturating_sub(1))
        } else {
            0
        };
        let to = if line_no == last && pos.end.column > 0 {
            ceil_boundary(line, pos.end.column)
        } else {
            line.len()
        };
        slice.push(&line[from..to.max(from)]);
    }

    slice.join("\n").trim_end().to_string()
}

fn floor_boundary(line: &str, index: usize) -> usize {
    let mut index = index.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(line: &str, index: usize) -> usize {
    let mut index = index.min(line.len());
    while !line.is_char_boundary(index) {
        index += 1;
    }
    index
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
