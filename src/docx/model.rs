//! In-memory word-processor document
//!
//! A deliberately small subset of WordprocessingML: one or more sections of
//! paragraphs and tables, paragraphs holding text runs and hyperlinks.
//! Measurements follow the file format: sizes in half-points, distances in
//! twips (1/1440 inch), border widths in eighths of a point.

/// Twips per inch.
pub const TWIPS_PER_INCH: u32 = 1440;

/// Convert inches to twips.
pub fn inches_to_twip(inches: f32) -> u32 {
    (inches * TWIPS_PER_INCH as f32).round() as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// A complete document: styles plus content sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub styles: DocumentStyles,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(styles: DocumentStyles) -> Self {
        Self {
            styles,
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// All top-level blocks across sections, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|section| section.children.iter())
    }
}

/// Document-wide defaults and named paragraph styles.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStyles {
    pub default_font: String,
    /// Half-points
    pub default_size: u32,
    pub paragraph_styles: Vec<ParagraphStyle>,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            default_font: "Calibri".to_string(),
            default_size: 22,
            paragraph_styles: Vec::new(),
        }
    }
}

/// A named paragraph style, referenced by id from [`Paragraph::style`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub id: String,
    pub name: String,
    pub based_on: Option<String>,
    pub font: Option<String>,
    pub size: Option<u32>,
    pub spacing: Option<Spacing>,
}

/// A page-setup section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub margins: PageMargins,
    pub children: Vec<Block>,
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl PageMargins {
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::uniform(TWIPS_PER_INCH)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// A top-level document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        }
    }
}

/// Built-in heading styles `Heading1`..`Heading6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl HeadingLevel {
    /// Map a Markdown heading depth; anything past 6 is clamped.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            _ => HeadingLevel::H6,
        }
    }

    pub fn depth(self) -> u8 {
        self as u8
    }

    /// Paragraph style id, e.g. `Heading1`.
    pub fn style_id(self) -> String {
        format!("Heading{}", self.depth())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Space before and after a paragraph, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

/// Background fill, as an RRGGBB hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shading {
    pub fill: String,
}

impl Shading {
    pub fn fill(color: &str) -> Self {
        Self {
            fill: color.to_string(),
        }
    }
}

/// A single-line border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    /// Eighths of a point
    pub size: u32,
    pub color: String,
}

impl Border {
    pub fn single(size: u32, color: &str) -> Self {
        Self {
            size,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParagraphBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
}

/// Left-aligned tab stop position, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub position: u32,
}

/// A paragraph and its formatting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub children: Vec<Inline>,
    pub heading: Option<HeadingLevel>,
    /// Paragraph style id; ignored when `heading` is set
    pub style: Option<String>,
    pub spacing: Option<Spacing>,
    /// Left indent, twips
    pub indent_left: Option<u32>,
    pub alignment: Option<Alignment>,
    pub shading: Option<Shading>,
    pub borders: Option<ParagraphBorders>,
    /// Bullet list level
    pub bullet_level: Option<u8>,
    pub tab_stops: Vec<TabStop>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(mut self, inline: impl Into<Inline>) -> Self {
        self.children.push(inline.into());
        self
    }

    pub fn children(mut self, inlines: impl IntoIterator<Item = Inline>) -> Self {
        self.children.extend(inlines);
        self
    }

    pub fn heading(mut self, level: HeadingLevel) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing = Some(Spacing { before, after });
        self
    }

    pub fn indent_left(mut self, twips: u32) -> Self {
        self.indent_left = Some(twips);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn borders(mut self, borders: ParagraphBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn bullet(mut self, level: u8) -> Self {
        self.bullet_level = Some(level);
        self
    }

    pub fn tab_stops(mut self, stops: impl IntoIterator<Item = TabStop>) -> Self {
        self.tab_stops.extend(stops);
        self
    }

    /// Runs directly in this paragraph, hyperlink runs included.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.children.iter().flat_map(|inline| match inline {
            Inline::Run(run) => std::slice::from_ref(run).iter(),
            Inline::Hyperlink(link) => link.runs.iter(),
        })
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs().map(|run| run.text.as_str()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inlines
// ─────────────────────────────────────────────────────────────────────────────

/// Content of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(TextRun),
    Hyperlink(Hyperlink),
}

impl From<TextRun> for Inline {
    fn from(run: TextRun) -> Self {
        Inline::Run(run)
    }
}

impl From<Hyperlink> for Inline {
    fn from(link: Hyperlink) -> Self {
        Inline::Hyperlink(link)
    }
}

/// Formatted text. A `\n` in `text` is written as a line break.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    pub font: Option<String>,
    /// Half-points
    pub size: Option<u32>,
    pub color: Option<String>,
    /// Keep leading/trailing spaces exactly
    pub preserve_space: bool,
    /// Character style id
    pub style: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italics(mut self) -> Self {
        self.italics = true;
        self
    }

    pub fn font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn preserve_space(mut self) -> Self {
        self.preserve_space = true;
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }
}

/// External hyperlink wrapping one or more runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub target: String,
    pub runs: Vec<TextRun>,
}

impl Hyperlink {
    pub fn new(target: &str, runs: Vec<TextRun>) -> Self {
        Self {
            target: target.to_string(),
            runs,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Width as a percentage of the text area
    pub width_percent: u32,
}

impl Table {
    /// Widest row, in cells.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    pub shading: Option<Shading>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
