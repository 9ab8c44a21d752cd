//! Markdown to word-processor document
//!
//! The source is lexed into block tokens and each token is mapped to one or
//! more document blocks with formatting taken from a [`StyleTable`]. The
//! mapping is total: a token without a dedicated rule becomes a paragraph of
//! its raw source text.
//!
//! Two shortcuts are intentional. Math is written as italic TeX in the math
//! font rather than typeset, and list items are numbered `1.`, `2.`, ...
//! whether the source list is ordered or not.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::html::{output_path, write_export};
use super::options::ExportFormat;
use super::styles::StyleTable;
use crate::docx::{
    inches_to_twip, to_bytes, Alignment, Block, Border, Document, DocumentStyles, HeadingLevel,
    Hyperlink, Inline, PageMargins, Paragraph, ParagraphBorders, ParagraphStyle, Section, Shading,
    Spacing, TabStop, Table, TableCell, TableRow, TextRun,
};
use crate::error::Result;
use crate::markdown::{lex, split_math, ListItem, MarkdownOptions, MathSegment, TableAlignment, Token};

/// Paragraph style id of code blocks.
pub const CODE_STYLE_ID: &str = "Code";
/// Character style id of link text.
pub const HYPERLINK_STYLE_ID: &str = "Hyperlink";

/// Width of one default tab stop, twips.
const TAB_STOP_INTERVAL: u32 = 9026;
const CODE_TAB_STOPS: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Token Mapping
// ─────────────────────────────────────────────────────────────────────────────

/// Map one token to document blocks. Never returns an empty vector.
pub fn map_token(token: &Token, styles: &StyleTable) -> Vec<Block> {
    let block = match token {
        Token::Heading { depth, text } => Block::Paragraph(heading(*depth, text, styles)),
        Token::Paragraph { text } => Block::Paragraph(paragraph(text, styles)),
        Token::Code { lang, text } => Block::Paragraph(code(lang.as_deref(), text, styles)),
        Token::List { items, .. } => Block::Paragraph(list(items, styles)),
        Token::Blockquote { text } => Block::Paragraph(blockquote(text, styles)),
        Token::Table {
            header,
            align,
            rows,
        } => Block::Table(table(header.as_deref(), align, rows, styles)),
        Token::Link { href, text } => Block::Paragraph(link(href, text, styles)),
        Token::Other { raw } => Block::Paragraph(
            Paragraph::new().child(TextRun::new(raw.as_str()).size(styles.default.size)),
        ),
    };
    vec![block]
}

fn heading(depth: u8, text: &str, styles: &StyleTable) -> Paragraph {
    let style = styles.heading(depth);
    let mut run = TextRun::new(text).size(style.size);
    if style.bold {
        run = run.bold();
    }

    Paragraph::new()
        .heading(HeadingLevel::from_depth(depth))
        .spacing(240, 120)
        .child(run)
}

fn paragraph(text: &str, styles: &StyleTable) -> Paragraph {
    let runs = split_math(text).into_iter().map(|segment| match segment {
        MathSegment::Text(plain) => Inline::from(TextRun::new(plain)),
        MathSegment::Math { tex, .. } => {
            Inline::from(TextRun::new(tex).italics().font(styles.math_font))
        }
    });

    Paragraph::new().spacing(120, 120).children(runs)
}

fn code(lang: Option<&str>, text: &str, styles: &StyleTable) -> Paragraph {
    let code_style = &styles.code;
    let code_run = |text: String| TextRun::new(text).font(code_style.font).size(code_style.size);

    let label = lang.unwrap_or("text").to_uppercase();
    let mut paragraph = Paragraph::new()
        .style(CODE_STYLE_ID)
        .child(code_run(format!("{}\n", label)).bold());

    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let content = line.trim_start();
        // Leading whitespace of any kind is written as that many spaces
        let indent = line[..line.len() - content.len()].chars().count();
        let newline = if i < last { "\n" } else { "" };

        paragraph = paragraph
            .child(code_run(" ".repeat(indent)).preserve_space())
            .child(code_run(format!("{}{}", content, newline)));
    }

    paragraph
        .tab_stops((1..=CODE_TAB_STOPS).map(|i| TabStop {
            position: TAB_STOP_INTERVAL * i,
        }))
        .shading(Shading::fill(styles.code_background(lang)))
        .borders(ParagraphBorders {
            top: Some(Border::single(1, code_style.border)),
            left: Some(Border::single(4, code_style.border)),
            bottom: Some(Border::single(1, code_style.border)),
            right: Some(Border::single(1, code_style.border)),
        })
        .indent_left(inches_to_twip(0.25))
}

fn list(items: &[ListItem], styles: &StyleTable) -> Paragraph {
    let runs = items.iter().enumerate().map(|(i, item)| {
        Inline::from(TextRun::new(format!("{}. {}\n", i + 1, item.text)).size(styles.default.size))
    });

    Paragraph::new()
        .children(runs)
        .bullet(0)
        .indent_left(inches_to_twip(0.5))
}

fn blockquote(text: &str, styles: &StyleTable) -> Paragraph {
    Paragraph::new()
        .child(TextRun::new(text).italics().size(styles.default.size))
        .indent_left(inches_to_twip(0.5))
        .borders(ParagraphBorders {
            left: Some(Border::single(4, styles.code.border)),
            ..ParagraphBorders::default()
        })
}

fn table(
    header: Option<&[String]>,
    align: &[TableAlignment],
    rows: &[Vec<String>],
    styles: &StyleTable,
) -> Table {
    let mut table_rows = Vec::with_capacity(rows.len() + 1);

    if let Some(header) = header {
        let cells = header
            .iter()
            .map(|text| TableCell {
                paragraphs: vec![Paragraph::new()
                    .alignment(Alignment::Center)
                    .child(TextRun::new(text.as_str()).bold().size(styles.default.size))],
                shading: Some(Shading::fill(styles.code.background)),
            })
            .collect();
        table_rows.push(TableRow { cells });
    }

    for row in rows {
        let cells = row
            .iter()
            .enumerate()
            .map(|(column, text)| {
                let mut paragraph =
                    Paragraph::new().child(TextRun::new(text.as_str()).size(styles.default.size));
                if let Some(alignment) = column_alignment(align, column) {
                    paragraph = paragraph.alignment(alignment);
                }
                TableCell {
                    paragraphs: vec![paragraph],
                    shading: None,
                }
            })
            .collect();
        table_rows.push(TableRow { cells });
    }

    Table {
        rows: table_rows,
        width_percent: 100,
    }
}

fn column_alignment(align: &[TableAlignment], column: usize) -> Option<Alignment> {
    match align.get(column)? {
        TableAlignment::None => None,
        TableAlignment::Left => Some(Alignment::Left),
        TableAlignment::Center => Some(Alignment::Center),
        TableAlignment::Right => Some(Alignment::Right),
    }
}

fn link(href: &str, text: &str, styles: &StyleTable) -> Paragraph {
    let run = TextRun::new(text)
        .style(HYPERLINK_STYLE_ID)
        .size(styles.default.size);
    Paragraph::new().child(Hyperlink::new(href, vec![run]))
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Document-wide defaults plus the `Code` paragraph style.
pub fn document_styles(styles: &StyleTable) -> DocumentStyles {
    DocumentStyles {
        default_font: styles.default.font.to_string(),
        default_size: styles.default.size,
        paragraph_styles: vec![ParagraphStyle {
            id: CODE_STYLE_ID.to_string(),
            name: CODE_STYLE_ID.to_string(),
            based_on: Some("Normal".to_string()),
            font: Some(styles.code.font.to_string()),
            size: Some(styles.code.size),
            spacing: Some(Spacing {
                before: 240,
                after: 240,
            }),
        }],
    }
}

/// Map every token, in order, into a single one-inch-margin section.
pub fn build_document(tokens: &[Token], styles: &StyleTable) -> Document {
    let children = tokens
        .iter()
        .flat_map(|token| map_token(token, styles))
        .collect();

    Document::new(document_styles(styles)).section(Section {
        margins: PageMargins::uniform(inches_to_twip(1.0)),
        children,
    })
}

/// Lex, map and serialize `markdown` to DOCX bytes.
pub fn markdown_to_docx(
    markdown: &str,
    options: &MarkdownOptions,
    styles: &StyleTable,
) -> Result<Vec<u8>> {
    let tokens = lex(markdown, options);
    debug!("Mapping {} tokens to document blocks", tokens.len());
    to_bytes(&build_document(&tokens, styles))
}

/// Write `document.docx` into `output_dir` and return its path.
pub fn export_docx(
    markdown: &str,
    options: &MarkdownOptions,
    styles: &StyleTable,
    output_dir: &Path,
) -> Result<PathBuf> {
    let bytes = markdown_to_docx(markdown, options, styles)?;
    let path = output_path(ExportFormat::Docx, output_dir)?;

    write_export(&path, &bytes)?;
    info!("Exported DOCX to {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{read_outline, read_paragraphs};
    use tempfile::TempDir;

    fn map_one(token: Token) -> Block {
        let mut blocks = map_token(&token, &StyleTable::default());
        assert_eq!(blocks.len(), 1);
        blocks.remove(0)
    }

    fn map_paragraph(token: Token) -> Paragraph {
        match map_one(token) {
            Block::Paragraph(paragraph) => paragraph,
            other => panic!("Expected paragraph, got {:?}", other),
        }
    }

    fn lex_default(markdown: &str) -> Vec<Token> {
        lex(markdown, &MarkdownOptions::default())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mapper
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_and_math_paragraph() {
        let tokens = lex_default("# Title\n\nHello $x^2$ world");
        let doc = build_document(&tokens, &StyleTable::default());
        let blocks: Vec<&Block> = doc.blocks().collect();
        assert_eq!(blocks.len(), 2);

        let heading = blocks[0].as_paragraph().unwrap();
        assert_eq!(heading.heading, Some(HeadingLevel::H1));
        assert_eq!(heading.text(), "Title");
        let title_run = heading.runs().next().unwrap();
        assert!(title_run.bold);
        assert_eq!(title_run.size, Some(36));

        let paragraph = blocks[1].as_paragraph().unwrap();
        let runs: Vec<&TextRun> = paragraph.runs().collect();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "Hello ");
        assert!(!runs[0].italics);
        assert_eq!(runs[1].text, "x^2");
        assert!(runs[1].italics);
        assert_eq!(runs[1].font.as_deref(), Some("Cambria Math"));
        assert_eq!(runs[2].text, " world");
        assert_eq!(paragraph.spacing, Some(Spacing { before: 120, after: 120 }));
    }

    #[test]
    fn test_heading_depth_clamped() {
        let paragraph = map_paragraph(Token::Heading {
            depth: 9,
            text: "deep".to_string(),
        });
        assert_eq!(paragraph.heading, Some(HeadingLevel::H6));
        assert_eq!(paragraph.runs().next().unwrap().size, Some(22));
    }

    #[test]
    fn test_display_math_run() {
        let paragraph = map_paragraph(Token::Paragraph {
            text: "$$E=mc^2$$".to_string(),
        });
        let runs: Vec<&TextRun> = paragraph.runs().collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "E=mc^2");
        assert!(runs[0].italics);
    }

    #[test]
    fn test_code_line_indentation() {
        let paragraph = map_paragraph(Token::Code {
            lang: Some("python".to_string()),
            text: "def f():\n    return 1".to_string(),
        });
        let runs: Vec<&TextRun> = paragraph.runs().collect();

        assert_eq!(runs.len(), 5);
        assert_eq!(runs[0].text, "PYTHON\n");
        assert!(runs[0].bold);
        assert_eq!(runs[1].text, "");
        assert_eq!(runs[2].text, "def f():\n");
        assert_eq!(runs[3].text, "    ");
        assert!(runs[3].preserve_space);
        assert_eq!(runs[4].text, "return 1");
        assert!(runs.iter().all(|run| run.font.as_deref() == Some("Consolas")));
    }

    #[test]
    fn test_code_indent_is_exactly_n_spaces() {
        for n in [0usize, 1, 2, 7, 12] {
            let text = format!("{}x = 1", " ".repeat(n));
            let paragraph = map_paragraph(Token::Code {
                lang: None,
                text,
            });
            let runs: Vec<&TextRun> = paragraph.runs().collect();
            assert_eq!(runs[1].text, " ".repeat(n));
            assert_eq!(runs[2].text, "x = 1");
        }
    }

    #[test]
    fn test_code_formatting() {
        let paragraph = map_paragraph(Token::Code {
            lang: Some("java".to_string()),
            text: "int x;".to_string(),
        });
        assert_eq!(paragraph.style.as_deref(), Some(CODE_STYLE_ID));
        assert_eq!(paragraph.shading, Some(Shading::fill("FFF5F5")));
        assert_eq!(paragraph.indent_left, Some(360));
        assert_eq!(paragraph.tab_stops.len(), 10);
        assert_eq!(paragraph.tab_stops[9].position, 90260);

        let borders = paragraph.borders.unwrap();
        assert_eq!(borders.left, Some(Border::single(4, "E5E7EB")));
        assert_eq!(borders.top, Some(Border::single(1, "E5E7EB")));
    }

    #[test]
    fn test_code_without_lang() {
        let paragraph = map_paragraph(Token::Code {
            lang: None,
            text: "plain".to_string(),
        });
        assert_eq!(paragraph.runs().next().unwrap().text, "TEXT\n");
        assert_eq!(paragraph.shading, Some(Shading::fill("F8F9FA")));
    }

    #[test]
    fn test_list_numbered_even_when_bulleted() {
        let tokens = lex_default("- apples\n- pears");
        let paragraph = map_paragraph(tokens[0].clone());
        let texts: Vec<&str> = paragraph.runs().map(|run| run.text.as_str()).collect();

        assert_eq!(texts, vec!["1. apples\n", "2. pears\n"]);
        assert_eq!(paragraph.bullet_level, Some(0));
        assert_eq!(paragraph.indent_left, Some(720));
    }

    #[test]
    fn test_blockquote() {
        let paragraph = map_paragraph(Token::Blockquote {
            text: "quoted".to_string(),
        });
        let run = paragraph.runs().next().unwrap();
        assert!(run.italics);
        assert_eq!(paragraph.indent_left, Some(720));

        let borders = paragraph.borders.unwrap();
        assert_eq!(borders.left, Some(Border::single(4, "E5E7EB")));
        assert!(borders.top.is_none());
    }

    #[test]
    fn test_table_header_and_alignment() {
        let tokens = lex_default("| Name | Qty |\n|------|----:|\n| a | 1 |");
        let table = match map_one(tokens[0].clone()) {
            Block::Table(table) => table,
            other => panic!("Expected table, got {:?}", other),
        };

        assert_eq!(table.width_percent, 100);
        assert_eq!(table.rows.len(), 2);

        let header = &table.rows[0].cells[0];
        assert_eq!(header.shading, Some(Shading::fill("F8F9FA")));
        let header_paragraph = &header.paragraphs[0];
        assert_eq!(header_paragraph.alignment, Some(Alignment::Center));
        assert!(header_paragraph.runs().all(|run| run.bold));
        assert_eq!(header_paragraph.text(), "Name");

        let body = &table.rows[1];
        assert_eq!(body.cells[0].paragraphs[0].alignment, None);
        assert_eq!(body.cells[1].paragraphs[0].alignment, Some(Alignment::Right));
        assert!(body.cells[1].shading.is_none());
    }

    #[test]
    fn test_table_without_header() {
        let token = Token::Table {
            header: None,
            align: vec![],
            rows: vec![vec!["x".to_string()], vec!["y".to_string(), "z".to_string()]],
        };
        let table = match map_one(token) {
            Block::Table(table) => table,
            other => panic!("Expected table, got {:?}", other),
        };
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_link() {
        let paragraph = map_paragraph(Token::Link {
            href: "https://example.com".to_string(),
            text: "Example".to_string(),
        });
        match &paragraph.children[0] {
            Inline::Hyperlink(link) => {
                assert_eq!(link.target, "https://example.com");
                assert_eq!(link.runs[0].text, "Example");
                assert_eq!(link.runs[0].style.as_deref(), Some(HYPERLINK_STYLE_ID));
            }
            other => panic!("Expected hyperlink, got {:?}", other),
        }
    }

    #[test]
    fn test_other_keeps_raw_source() {
        let tokens = lex_default("text\n\n---\n\nmore");
        let raw = match &tokens[1] {
            Token::Other { raw } => raw.clone(),
            other => panic!("Expected other, got {:?}", other),
        };
        let paragraph = map_paragraph(tokens[1].clone());
        assert_eq!(paragraph.text(), raw);
        assert_eq!(paragraph.text(), "---");
    }

    #[test]
    fn test_every_token_kind_maps_to_content() {
        let source = "# H\n\npara $a$\n\n```\ncode\n```\n\n1. one\n\n> quote\n\n\
                      | a |\n|---|\n| b |\n\n[link](https://x.org)\n\n***\n";
        let tokens = lex_default(source);
        let kinds: Vec<&str> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec!["heading", "paragraph", "code", "list", "blockquote", "table", "link", "other"]
        );

        for token in &tokens {
            let blocks = map_token(token, &StyleTable::default());
            assert!(!blocks.is_empty(), "{} produced nothing", token.kind());
            let has_content = blocks.iter().all(|block| match block {
                Block::Paragraph(paragraph) => !paragraph.children.is_empty(),
                Block::Table(table) => !table.rows.is_empty(),
            });
            assert!(has_content, "{} produced an empty block", token.kind());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assembly and serialization
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_build_document_section() {
        let doc = build_document(&[], &StyleTable::default());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].margins, PageMargins::uniform(1440));
        assert_eq!(doc.styles.default_font, "Arial");
        assert_eq!(doc.styles.paragraph_styles[0].id, "Code");
    }

    #[test]
    fn test_docx_round_trip() {
        let source = "# Title\n\nHello $x^2$ world\n\n## Next\n\n```bash\n  ls -la\n```";
        let bytes =
            markdown_to_docx(source, &MarkdownOptions::default(), &StyleTable::default()).unwrap();

        let outline = read_outline(&bytes).unwrap();
        assert_eq!(outline.len(), 2);
        assert_eq!((outline[0].level, outline[0].text.as_str()), (1, "Title"));
        assert_eq!((outline[1].level, outline[1].text.as_str()), (2, "Next"));

        let paragraphs = read_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs[1].text, "Hello x^2 world");
        assert_eq!(paragraphs[3].style.as_deref(), Some("Code"));
        assert_eq!(paragraphs[3].text, "BASH\n  ls -la");
    }

    #[test]
    fn test_export_docx_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = export_docx(
            "# Doc",
            &MarkdownOptions::default(),
            &StyleTable::default(),
            dir.path(),
        )
        .unwrap();

        assert_eq!(path, dir.path().join("document.docx"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(read_outline(&bytes).unwrap()[0].text, "Doc");
    }
}
