//! Minimal DOCX reading.
//!
//! Pulls paragraph text and style ids back out of `word/document.xml`. Used to
//! list the outline of an exported file and to check exports in tests.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// A paragraph as found in the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadParagraph {
    /// `w:pStyle` value, if any
    pub style: Option<String>,
    /// Run text; `w:br` and `w:tab` become `\n` and `\t`
    pub text: String,
}

/// A heading paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
}

/// Read every paragraph of a DOCX file, table cells included, in order.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<ReadParagraph>> {
    let xml = read_part(bytes, "word/document.xml")?;
    parse_paragraphs(&xml)
}

/// Headings of a DOCX file, taken from `HeadingN` paragraph styles.
pub fn read_outline(bytes: &[u8]) -> Result<Vec<OutlineEntry>> {
    let outline = read_paragraphs(bytes)?
        .into_iter()
        .filter_map(|paragraph| {
            let level = paragraph
                .style
                .as_deref()
                .and_then(|style| style.strip_prefix("Heading"))
                .and_then(|level| level.parse::<u8>().ok())?;
            Some(OutlineEntry {
                level,
                text: paragraph.text,
            })
        })
        .collect();
    Ok(outline)
}

fn read_part(bytes: &[u8], name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive
        .by_name(name)
        .map_err(|_| Error::Docx(format!("missing part {}", name)))?;
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

fn parse_paragraphs(xml: &str) -> Result<Vec<ReadParagraph>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<ReadParagraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    current = Some(ReadParagraph {
                        style: None,
                        text: String::new(),
                    })
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(ReadParagraph {
                    style: None,
                    text: String::new(),
                }),
                b"pStyle" => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.style = val_attribute(&e);
                    }
                }
                b"br" => push_text(&mut current, "\n"),
                b"tab" => {
                    // w:tab inside w:tabs is a tab stop definition, not content
                    if !in_text && current.as_ref().is_some() && val_attribute(&e).is_none() {
                        push_text(&mut current, "\t");
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    push_text(&mut current, &raw);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        push_text(&mut current, &resolved);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_text(current: &mut Option<ReadParagraph>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.text.push_str(text);
    }
}

fn val_attribute(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32).map(|c| c.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::model::{
        Block, Document, DocumentStyles, HeadingLevel, Paragraph, Section, TabStop, TextRun,
    };
    use crate::docx::writer::to_bytes;

    fn doc(blocks: Vec<Block>) -> Vec<u8> {
        let document = Document::new(DocumentStyles::default()).section(Section {
            children: blocks,
            ..Section::default()
        });
        to_bytes(&document).unwrap()
    }

    #[test]
    fn test_read_paragraph_text_and_style() {
        let bytes = doc(vec![
            Block::Paragraph(
                Paragraph::new()
                    .heading(HeadingLevel::H1)
                    .child(TextRun::new("Fish & Chips")),
            ),
            Block::Paragraph(
                Paragraph::new()
                    .style("Code")
                    .tab_stops([TabStop { position: 720 }])
                    .child(TextRun::new("PYTHON\n").bold())
                    .child(TextRun::new("  ").preserve_space())
                    .child(TextRun::new("x = 1")),
            ),
        ]);

        let paragraphs = read_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(paragraphs[0].text, "Fish & Chips");
        assert_eq!(paragraphs[1].style.as_deref(), Some("Code"));
        assert_eq!(paragraphs[1].text, "PYTHON\n  x = 1");
    }

    #[test]
    fn test_read_outline() {
        let bytes = doc(vec![
            Block::Paragraph(
                Paragraph::new()
                    .heading(HeadingLevel::H1)
                    .child(TextRun::new("Top")),
            ),
            Block::Paragraph(Paragraph::new().child(TextRun::new("body"))),
            Block::Paragraph(
                Paragraph::new()
                    .heading(HeadingLevel::H3)
                    .child(TextRun::new("Deep")),
            ),
        ]);

        let outline = read_outline(&bytes).unwrap();
        assert_eq!(
            outline,
            vec![
                OutlineEntry {
                    level: 1,
                    text: "Top".to_string()
                },
                OutlineEntry {
                    level: 3,
                    text: "Deep".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_not_a_docx() {
        assert!(read_paragraphs(b"plain text").is_err());
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#x41").as_deref(), Some("A"));
        assert_eq!(resolve_entity("#8226").as_deref(), Some("\u{2022}"));
        assert_eq!(resolve_entity("nbsp"), None);
    }
}
