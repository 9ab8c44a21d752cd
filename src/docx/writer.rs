//! DOCX serialization.
//!
//! Writes a [`Document`] as an Office Open XML package: a zip archive holding
//! the content types, package relationships, `word/document.xml`, styles,
//! bullet numbering and the hyperlink relationships of the document part.

use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::model::{
    Block, Border, Document, DocumentStyles, HeadingLevel, Hyperlink, Inline, PageMargins,
    Paragraph, ParagraphStyle, Table, TextRun,
};
use crate::error::Result;

/// Namespace of the WordprocessingML main part.
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Namespace of officeDocument relationships.
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A4 page, in twips.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;

/// `numId` of the single bullet definition in numbering.xml.
const BULLET_NUM_ID: u32 = 1;

/// Relationship ids 1 and 2 of the document part are styles and numbering.
const FIRST_LINK_REL_ID: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Package
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize `document` into an in-memory DOCX file.
pub fn to_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    write_docx(document, &mut buffer)?;
    Ok(buffer.into_inner())
}

/// Serialize `document` as a DOCX package into `writer`.
pub fn write_docx<W: Write + Seek>(document: &Document, writer: W) -> Result<()> {
    let mut links = Vec::new();
    let body = document_xml(document, &mut links);
    debug!(
        "Writing DOCX: {} sections, {} hyperlinks",
        document.sections.len(),
        links.len()
    );

    let mut zip = ZipWriter::new(writer);
    // Fixed timestamp keeps the archive byte-identical for identical input
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(CONTENT_TYPES_XML)?;

    zip.start_file("_rels/.rels", deflated)?;
    zip.write_all(PACKAGE_RELS_XML)?;

    zip.start_file("word/document.xml", deflated)?;
    zip.write_all(body.as_bytes())?;

    zip.start_file("word/styles.xml", deflated)?;
    zip.write_all(styles_xml(&document.styles).as_bytes())?;

    zip.start_file("word/numbering.xml", deflated)?;
    zip.write_all(numbering_xml().as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", deflated)?;
    zip.write_all(document_rels_xml(&links).as_bytes())?;

    zip.finish()?;
    Ok(())
}

const CONTENT_TYPES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>
"#;

const PACKAGE_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

fn document_rels_xml(links: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
"#,
    );
    for (i, target) in links.iter().enumerate() {
        let _ = writeln!(
            xml,
            r#"  <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            FIRST_LINK_REL_ID + i,
            escape_xml(target)
        );
    }
    xml.push_str("</Relationships>\n");
    xml
}

// ─────────────────────────────────────────────────────────────────────────────
// document.xml
// ─────────────────────────────────────────────────────────────────────────────

/// Render the main document part; hyperlink targets are appended to `links`
/// in relationship-id order.
fn document_xml(document: &Document, links: &mut Vec<String>) -> String {
    let mut xml = String::new();
    let _ = write!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#,
        W_NS, R_NS
    );

    let last = document.sections.len().saturating_sub(1);
    for (i, section) in document.sections.iter().enumerate() {
        for block in &section.children {
            match block {
                Block::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph, links),
                Block::Table(table) => write_table(&mut xml, table, links),
            }
        }
        if i < last {
            // A section that is not the last one ends with a paragraph carrying its sectPr
            xml.push_str("<w:p><w:pPr>");
            write_section_properties(&mut xml, &section.margins);
            xml.push_str("</w:pPr></w:p>");
        } else {
            write_section_properties(&mut xml, &section.margins);
        }
    }

    xml.push_str("</w:body></w:document>");
    xml
}

fn write_section_properties(xml: &mut String, margins: &PageMargins) {
    let _ = write!(
        xml,
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
        PAGE_WIDTH, PAGE_HEIGHT, margins.top, margins.right, margins.bottom, margins.left
    );
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph, links: &mut Vec<String>) {
    xml.push_str("<w:p>");
    write_paragraph_properties(xml, paragraph);

    for inline in &paragraph.children {
        match inline {
            Inline::Run(run) => write_run(xml, run),
            Inline::Hyperlink(link) => write_hyperlink(xml, link, links),
        }
    }

    xml.push_str("</w:p>");
}

/// Child order follows the `CT_PPr` schema sequence.
fn write_paragraph_properties(xml: &mut String, paragraph: &Paragraph) {
    let mut props = String::new();

    let style = paragraph
        .heading
        .map(HeadingLevel::style_id)
        .or_else(|| paragraph.style.clone());
    if let Some(style) = style {
        let _ = write!(props, r#"<w:pStyle w:val="{}"/>"#, escape_xml(&style));
    }

    if let Some(level) = paragraph.bullet_level {
        let _ = write!(
            props,
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            level, BULLET_NUM_ID
        );
    }

    if let Some(borders) = &paragraph.borders {
        props.push_str("<w:pBdr>");
        for (side, border) in [
            ("top", &borders.top),
            ("left", &borders.left),
            ("bottom", &borders.bottom),
            ("right", &borders.right),
        ] {
            if let Some(border) = border {
                write_border(&mut props, side, border);
            }
        }
        props.push_str("</w:pBdr>");
    }

    if let Some(shading) = &paragraph.shading {
        write_shading(&mut props, &shading.fill);
    }

    if !paragraph.tab_stops.is_empty() {
        props.push_str("<w:tabs>");
        for stop in &paragraph.tab_stops {
            let _ = write!(props, r#"<w:tab w:val="left" w:pos="{}"/>"#, stop.position);
        }
        props.push_str("</w:tabs>");
    }

    if let Some(spacing) = paragraph.spacing {
        let _ = write!(
            props,
            r#"<w:spacing w:before="{}" w:after="{}"/>"#,
            spacing.before, spacing.after
        );
    }

    if let Some(left) = paragraph.indent_left {
        let _ = write!(props, r#"<w:ind w:left="{}"/>"#, left);
    }

    if let Some(alignment) = paragraph.alignment {
        let _ = write!(props, r#"<w:jc w:val="{}"/>"#, alignment.as_str());
    }

    if !props.is_empty() {
        xml.push_str("<w:pPr>");
        xml.push_str(&props);
        xml.push_str("</w:pPr>");
    }
}

fn write_border(xml: &mut String, side: &str, border: &Border) {
    let _ = write!(
        xml,
        r#"<w:{} w:val="single" w:sz="{}" w:space="1" w:color="{}"/>"#,
        side,
        border.size,
        escape_xml(&border.color)
    );
}

fn write_shading(xml: &mut String, fill: &str) {
    let _ = write!(
        xml,
        r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
        escape_xml(fill)
    );
}

fn write_hyperlink(xml: &mut String, link: &Hyperlink, links: &mut Vec<String>) {
    let rel_id = FIRST_LINK_REL_ID + links.len();
    links.push(link.target.clone());

    let _ = write!(xml, r#"<w:hyperlink r:id="rId{}" w:history="1">"#, rel_id);
    for run in &link.runs {
        write_run(xml, run);
    }
    xml.push_str("</w:hyperlink>");
}

/// Child order follows the `CT_RPr` schema sequence.
fn write_run(xml: &mut String, run: &TextRun) {
    xml.push_str("<w:r>");

    let mut props = String::new();
    if let Some(style) = &run.style {
        let _ = write!(props, r#"<w:rStyle w:val="{}"/>"#, escape_xml(style));
    }
    if let Some(font) = &run.font {
        write_fonts(&mut props, font);
    }
    if run.bold {
        props.push_str("<w:b/><w:bCs/>");
    }
    if run.italics {
        props.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = &run.color {
        let _ = write!(props, r#"<w:color w:val="{}"/>"#, escape_xml(color));
    }
    if let Some(size) = run.size {
        write_size(&mut props, size);
    }
    if !props.is_empty() {
        xml.push_str("<w:rPr>");
        xml.push_str(&props);
        xml.push_str("</w:rPr>");
    }

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        if line.is_empty() {
            continue;
        }
        let preserve = run.preserve_space
            || line.starts_with(char::is_whitespace)
            || line.ends_with(char::is_whitespace);
        if preserve {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
        } else {
            xml.push_str("<w:t>");
        }
        xml.push_str(&escape_xml(line));
        xml.push_str("</w:t>");
    }

    xml.push_str("</w:r>");
}

fn write_fonts(xml: &mut String, font: &str) {
    let font = escape_xml(font);
    let _ = write!(
        xml,
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
        font
    );
}

fn write_size(xml: &mut String, half_points: u32) {
    let _ = write!(
        xml,
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        half_points
    );
}

fn write_table(xml: &mut String, table: &Table, links: &mut Vec<String>) {
    let columns = table.column_count().max(1);
    let text_width = PAGE_WIDTH - 2 * PageMargins::default().left;

    let _ = write!(
        xml,
        r#"<w:tbl><w:tblPr><w:tblW w:w="{}" w:type="pct"/><w:tblBorders>"#,
        table.width_percent * 50
    );
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let _ = write!(
            xml,
            r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
            side
        );
    }
    xml.push_str("</w:tblBorders></w:tblPr><w:tblGrid>");
    for _ in 0..columns {
        let _ = write!(xml, r#"<w:gridCol w:w="{}"/>"#, text_width / columns as u32);
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in &row.cells {
            xml.push_str(r#"<w:tc><w:tcPr><w:tcW w:w="0" w:type="auto"/>"#);
            if let Some(shading) = &cell.shading {
                write_shading(xml, &shading.fill);
            }
            xml.push_str("</w:tcPr>");
            if cell.paragraphs.is_empty() {
                // Every cell needs at least one paragraph
                xml.push_str("<w:p/>");
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(xml, paragraph, links);
            }
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
}

// ─────────────────────────────────────────────────────────────────────────────
// styles.xml / numbering.xml
// ─────────────────────────────────────────────────────────────────────────────

fn styles_xml(styles: &DocumentStyles) -> String {
    let mut xml = String::new();
    let _ = write!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{}"><w:docDefaults><w:rPrDefault><w:rPr>"#,
        W_NS
    );
    write_fonts(&mut xml, &styles.default_font);
    write_size(&mut xml, styles.default_size);
    xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>");

    xml.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    );

    for depth in 1..=6u8 {
        let level = HeadingLevel::from_depth(depth);
        let _ = write!(
            xml,
            r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="heading {}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="{}"/></w:pPr><w:rPr><w:b/><w:bCs/></w:rPr></w:style>"#,
            level.style_id(),
            depth,
            depth - 1
        );
    }

    xml.push_str(
        r#"<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/><w:rPr><w:color w:val="0563C1"/><w:u w:val="single"/></w:rPr></w:style>"#,
    );

    for style in &styles.paragraph_styles {
        write_paragraph_style(&mut xml, style);
    }

    xml.push_str("</w:styles>");
    xml
}

fn write_paragraph_style(xml: &mut String, style: &ParagraphStyle) {
    let _ = write!(
        xml,
        r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{}"><w:name w:val="{}"/>"#,
        escape_xml(&style.id),
        escape_xml(&style.name)
    );
    if let Some(based_on) = &style.based_on {
        let _ = write!(xml, r#"<w:basedOn w:val="{}"/>"#, escape_xml(based_on));
    }
    if let Some(spacing) = style.spacing {
        let _ = write!(
            xml,
            r#"<w:pPr><w:spacing w:before="{}" w:after="{}"/></w:pPr>"#,
            spacing.before, spacing.after
        );
    }
    if style.font.is_some() || style.size.is_some() {
        xml.push_str("<w:rPr>");
        if let Some(font) = &style.font {
            write_fonts(xml, font);
        }
        if let Some(size) = style.size {
            write_size(xml, size);
        }
        xml.push_str("</w:rPr>");
    }
    xml.push_str("</w:style>");
}

fn numbering_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="{}"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#,
        W_NS, BULLET_NUM_ID
    )
}

/// Escape text for element content and double-quoted attributes.
fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters other than tab are not allowed in XML 1.0
            c if c.is_control() && c != '\t' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
