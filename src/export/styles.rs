//! Formatting attributes for the document exporter
//!
//! One immutable table maps each semantic category (body text, code, heading
//! levels, math) to fonts, sizes and colors. Sizes are half-points and colors
//! RRGGBB hex, as in the document model.

/// Font, size and color of a text category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStyle {
    pub font: &'static str,
    pub size: u32,
    pub color: &'static str,
}

/// Heading run formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingStyle {
    pub size: u32,
    pub bold: bool,
}

/// Code block formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStyle {
    pub font: &'static str,
    pub size: u32,
    /// Background for languages without an entry of their own
    pub background: &'static str,
    pub border: &'static str,
    /// Style-level indent, twips
    pub indent: u32,
}

/// Formatting for every category the mapper emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    pub default: FontStyle,
    pub code: CodeStyle,
    /// h1 through h6
    pub headings: [HeadingStyle; 6],
    /// Per-language code backgrounds, keyed by lowercase language tag
    pub language_backgrounds: &'static [(&'static str, &'static str)],
    pub math_font: &'static str,
}

const fn heading(size: u32) -> HeadingStyle {
    HeadingStyle { size, bold: true }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            default: FontStyle {
                font: "Arial",
                size: 24,
                color: "000000",
            },
            code: CodeStyle {
                font: "Consolas",
                size: 20,
                background: "F8F9FA",
                border: "E5E7EB",
                indent: 240,
            },
            headings: [
                heading(36),
                heading(32),
                heading(28),
                heading(26),
                heading(24),
                heading(22),
            ],
            language_backgrounds: &[
                ("python", "F5F7FF"),
                ("java", "FFF5F5"),
                ("cpp", "F5FFF5"),
                ("javascript", "FFFFF5"),
                ("sql", "FFF5FF"),
                ("bash", "F5F5F5"),
            ],
            math_font: "Cambria Math",
        }
    }
}

impl StyleTable {
    /// Heading style for a Markdown depth; depths past 6 use h6.
    pub fn heading(&self, depth: u8) -> HeadingStyle {
        let index = usize::from(depth.clamp(1, 6)) - 1;
        self.headings[index]
    }

    /// Code background for a language tag, falling back to the code default.
    pub fn code_background(&self, lang: Option<&str>) -> &'static str {
        lang.and_then(|lang| {
            self.language_backgrounds
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(lang))
                .map(|(_, color)| *color)
        })
        .unwrap_or(self.code.background)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
