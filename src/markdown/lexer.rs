//! Block-level token stream for the document exporter
//!
//! The exporter does not walk the full AST. It consumes one flat token per
//! top-level block, each carrying just the fields the mapper needs. Anything
//! without a dedicated variant becomes [`Token::Other`] holding its exact
//! source text, so no block is ever lost.

use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    Arena,
};

use super::parser::{block_text, inline_text, parse, source_slice, MarkdownOptions, TableAlignment};

// ─────────────────────────────────────────────────────────────────────────────
// Token Types
// ─────────────────────────────────────────────────────────────────────────────

/// A top-level Markdown block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `#` to `######`, or a setext heading
    Heading { depth: u8, text: String },
    /// Paragraph source text, inline markup left as written
    Paragraph { text: String },
    /// Fenced or indented code
    Code { lang: Option<String>, text: String },
    /// Ordered or bullet list
    List {
        ordered: bool,
        start: usize,
        items: Vec<ListItem>,
    },
    /// Quoted text with `>` markers stripped
    Blockquote { text: String },
    /// GFM table
    Table {
        header: Option<Vec<String>>,
        align: Vec<TableAlignment>,
        rows: Vec<Vec<String>>,
    },
    /// A paragraph consisting of nothing but one link
    Link { href: String, text: String },
    /// Any other block, as raw source
    Other { raw: String },
}

/// One list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    /// `Some` for task list items
    pub checked: Option<bool>,
}

impl Token {
    /// Short lowercase name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Heading { .. } => "heading",
            Token::Paragraph { .. } => "paragraph",
            Token::Code { .. } => "code",
            Token::List { .. } => "list",
            Token::Blockquote { .. } => "blockquote",
            Token::Table { .. } => "table",
            Token::Link { .. } => "link",
            Token::Other { .. } => "other",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexing
// ─────────────────────────────────────────────────────────────────────────────

/// Lex `markdown` into one token per top-level block, in document order.
pub fn lex(markdown: &str, options: &MarkdownOptions) -> Vec<Token> {
    let arena = Arena::new();
    let root = parse(&arena, markdown, options);
    let tokens = root
        .children()
        .map(|block| block_to_token(block, markdown))
        .collect();
    tokens
}

fn block_to_token<'a>(node: &'a AstNode<'a>, source: &str) -> Token {
    let ast = node.data.borrow();

    match &ast.value {
        NodeValue::Heading(heading) => Token::Heading {
            depth: heading.level,
            text: inline_text(node),
        },
        NodeValue::Paragraph => match sole_link(node) {
            Some(link) => link,
            None => Token::Paragraph {
                text: source_slice(source, ast.sourcepos),
            },
        },
        NodeValue::CodeBlock(code) => {
            let lang = code
                .info
                .split_whitespace()
                .next()
                .map(|lang| lang.to_string());
            Token::Code {
                lang,
                text: code.literal.strip_suffix('\n').unwrap_or(&code.literal).to_string(),
            }
        }
        NodeValue::List(list) => Token::List {
            ordered: matches!(list.list_type, ListType::Ordered),
            start: list.start,
            items: node.children().map(list_item).collect(),
        },
        NodeValue::BlockQuote => Token::Blockquote {
            text: block_text(node),
        },
        NodeValue::Table(table) => {
            let mut header = None;
            let mut rows = Vec::new();
            for row in node.children() {
                let cells: Vec<String> = row.children().map(inline_text).collect();
                let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                if is_header && header.is_none() {
                    header = Some(cells);
                } else {
                    rows.push(cells);
                }
            }
            Token::Table {
                header,
                align: table.alignments.iter().map(|a| TableAlignment::from(*a)).collect(),
                rows,
            }
        }
        _ => Token::Other {
            raw: source_slice(source, ast.sourcepos),
        },
    }
}

/// A paragraph whose only inline is a link becomes a `Link` token.
fn sole_link<'a>(paragraph: &'a AstNode<'a>) -> Option<Token> {
    let link = paragraph.first_child()?;
    if link.next_sibling().is_some() {
        return None;
    }
    let href = match &link.data.borrow().value {
        NodeValue::Link(link) => link.url.clone(),
        _ => return None,
    };
    Some(Token::Link {
        href,
        text: inline_text(link),
    })
}

fn list_item<'a>(item: &'a AstNode<'a>) -> ListItem {
    let checked = match item.data.borrow().value {
        NodeValue::TaskItem(mark) => Some(mark.is_some_and(|c| c == 'x' || c == 'X')),
        _ => None,
    };
    ListItem {
        text: block_text(item),
        checked,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_default(markdown: &str) -> Vec<Token> {
        lex(markdown, &MarkdownOptions::default())
    }

    #[test]
    fn test_lex_empty_document() {
        assert!(lex_default("").is_empty());
    }

    #[test]
    fn test_lex_heading() {
        let tokens = lex_default("## Section *two*");
        assert_eq!(
            tokens,
            vec![Token::Heading {
                depth: 2,
                text: "Section two".to_string()
            }]
        );
    }

    #[test]
    fn test_lex_paragraph_keeps_source() {
        let tokens = lex_default("Hello $a_1$ and **bold**");
        assert_eq!(
            tokens,
            vec![Token::Paragraph {
                text: "Hello $a_1$ and **bold**".to_string()
            }]
        );
    }

    #[test]
    fn test_lex_code_block() {
        let tokens = lex_default("```python\ndef f():\n    return 1\n```");
        assert_eq!(
            tokens,
            vec![Token::Code {
                lang: Some("python".to_string()),
                text: "def f():\n    return 1".to_string()
            }]
        );
    }

    #[test]
    fn test_lex_indented_code_has_no_lang() {
        let tokens = lex_default("    plain code");
        assert!(matches!(&tokens[0], Token::Code { lang: None, text } if text == "plain code"));
    }

    #[test]
    fn test_lex_lists() {
        let tokens = lex_default("- one\n- two");
        match &tokens[0] {
            Token::List { ordered, items, .. } => {
                assert!(!ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].text, "two");
                assert_eq!(items[1].checked, None);
            }
            other => panic!("Expected list, got {:?}", other),
        }

        let tokens = lex_default("3. three\n4. four");
        assert!(matches!(&tokens[0], Token::List { ordered: true, start: 3, .. }));
    }

    #[test]
    fn test_lex_task_list() {
        let tokens = lex_default("- [x] done\n- [ ] todo");
        match &tokens[0] {
            Token::List { items, .. } => {
                assert_eq!(items[0].checked, Some(true));
                assert_eq!(items[1].checked, Some(false));
                assert_eq!(items[1].text, "todo");
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_lex_blockquote() {
        let tokens = lex_default("> quoted *text*");
        assert_eq!(
            tokens,
            vec![Token::Blockquote {
                text: "quoted text".to_string()
            }]
        );
    }

    #[test]
    fn test_lex_table() {
        let tokens = lex_default("| A | B |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |");
        match &tokens[0] {
            Token::Table { header, align, rows } => {
                assert_eq!(header.as_deref(), Some(&["A".to_string(), "B".to_string()][..]));
                assert_eq!(align, &vec![TableAlignment::Left, TableAlignment::Right]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1], vec!["3".to_string(), "4".to_string()]);
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_lex_standalone_link() {
        let tokens = lex_default("[Rust](https://www.rust-lang.org)");
        assert_eq!(
            tokens,
            vec![Token::Link {
                href: "https://www.rust-lang.org".to_string(),
                text: "Rust".to_string()
            }]
        );
    }

    #[test]
    fn test_lex_link_inside_text_is_paragraph() {
        let tokens = lex_default("See [Rust](https://www.rust-lang.org) here");
        assert!(matches!(&tokens[0], Token::Paragraph { .. }));
    }

    #[test]
    fn test_lex_other_keeps_raw_source() {
        let tokens = lex_default("before\n\n***\n\nafter");
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[1],
            Token::Other {
                raw: "***".to_string()
            }
        );
        assert_eq!(tokens[1].kind(), "other");
    }
}
