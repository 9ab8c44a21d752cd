//! Inline and block math delimiters
//!
//! Text is scanned left to right with a non-greedy pattern for `$$...$$`
//! (display) and `$...$` (inline). The preview hands each math span to a
//! [`MathRenderer`]; the document exporter keeps the TeX as styled text.

use log::warn;
use regex::Regex;
use std::sync::OnceLock;

/// `$$...$$` is tried before `$...$` at every position.
const MATH_PATTERN: &str = r"\$\$(.*?)\$\$|\$(.*?)\$";

fn math_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MATH_PATTERN).expect("math pattern is a valid regex"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Segmentation
// ─────────────────────────────────────────────────────────────────────────────

/// One piece of a text split on math delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathSegment<'a> {
    /// Plain text between math spans
    Text(&'a str),
    /// A delimited math span
    Math {
        /// TeX between the delimiters
        tex: &'a str,
        /// `true` for `$$...$$`
        display: bool,
        /// The full match including delimiters
        raw: &'a str,
    },
}

/// Split `text` into alternating plain and math segments, in order.
///
/// Spans with empty TeX (`$$` on its own) stay literal text. Adjacent text
/// segments are merged, so the output never holds two `Text` in a row.
pub fn split_math(text: &str) -> Vec<MathSegment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;

    for caps in math_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (tex, display) = match (caps.get(1), caps.get(2)) {
            (Some(block), _) => (block.as_str(), true),
            (None, Some(inline)) => (inline.as_str(), false),
            (None, None) => continue,
        };
        if tex.is_empty() {
            continue;
        }

        if whole.start() > text_start {
            segments.push(MathSegment::Text(&text[text_start..whole.start()]));
        }
        segments.push(MathSegment::Math {
            tex,
            display,
            raw: whole.as_str(),
        });
        text_start = whole.end();
    }

    if text_start < text.len() {
        segments.push(MathSegment::Text(&text[text_start..]));
    }

    segments
}

/// Whether `text` contains at least one renderable math span.
pub fn contains_math(text: &str) -> bool {
    split_math(text)
        .iter()
        .any(|segment| matches!(segment, MathSegment::Math { .. }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of rendering one TeX expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathResult {
    /// Markup ready to be inlined into HTML
    Rendered(String),
    /// The renderer rejected the input
    Failed { original: String, reason: String },
}

/// Renders TeX to HTML markup. Implementations never panic on bad input.
pub trait MathRenderer {
    fn render(&self, tex: &str, display: bool) -> MathResult;
}

/// TeX to MathML through `latex2mathml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlRenderer;

impl MathRenderer for MathMlRenderer {
    fn render(&self, tex: &str, display: bool) -> MathResult {
        let style = if display {
            latex2mathml::DisplayStyle::Block
        } else {
            latex2mathml::DisplayStyle::Inline
        };

        match latex2mathml::latex_to_mathml(tex, style) {
            Ok(mathml) => {
                let class = if display { "math math-display" } else { "math math-inline" };
                MathResult::Rendered(format!("<span class=\"{}\">{}</span>", class, mathml))
            }
            Err(e) => MathResult::Failed {
                original: tex.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Render one math span, falling back to its delimited source on failure.
///
/// The fallback is returned unescaped; callers escape it like any other text.
pub fn render_or_fallback(
    renderer: &dyn MathRenderer,
    tex: &str,
    display: bool,
    raw: &str,
) -> Result<String, String> {
    match renderer.render(tex, display) {
        MathResult::Rendered(markup) => Ok(markup),
        MathResult::Failed { original, reason } => {
            warn!("Math parsing error in '{}': {}", original, reason);
            Err(raw.to_string())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRenderer;

    impl MathRenderer for FailingRenderer {
        fn render(&self, tex: &str, _display: bool) -> MathResult {
            MathResult::Failed {
                original: tex.to_string(),
                reason: "unsupported".to_string(),
            }
        }
    }

    #[test]
    fn test_split_inline_math() {
        let segments = split_math("Hello $x^2$ world");
        assert_eq!(
            segments,
            vec![
                MathSegment::Text("Hello "),
                MathSegment::Math {
                    tex: "x^2",
                    display: false,
                    raw: "$x^2$"
                },
                MathSegment::Text(" world"),
            ]
        );
    }

    #[test]
    fn test_split_block_math_preferred() {
        let segments = split_math("$$a+b$$");
        assert_eq!(
            segments,
            vec![MathSegment::Math {
                tex: "a+b",
                display: true,
                raw: "$$a+b$$"
            }]
        );
    }

    #[test]
    fn test_split_is_non_greedy() {
        let segments = split_math("$a$ and $b$");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], MathSegment::Text(" and "));
    }

    #[test]
    fn test_unbalanced_delimiter_is_text() {
        assert_eq!(split_math("costs $5"), vec![MathSegment::Text("costs $5")]);
        assert!(!contains_math("costs $5"));
    }

    #[test]
    fn test_empty_math_is_text() {
        assert_eq!(split_math("a $$ b"), vec![MathSegment::Text("a $$ b")]);
    }

    #[test]
    fn test_math_does_not_cross_lines() {
        assert!(!contains_math("$a\nb$"));
    }

    #[test]
    fn test_mathml_renderer() {
        match MathMlRenderer.render("x^2", false) {
            MathResult::Rendered(markup) => {
                assert!(markup.contains("math-inline"));
                assert!(markup.contains("<math"));
            }
            MathResult::Failed { reason, .. } => panic!("render failed: {}", reason),
        }
    }

    #[test]
    fn test_render_or_fallback() {
        let rendered = render_or_fallback(&FailingRenderer, "x", false, "$x$");
        assert_eq!(rendered, Err("$x$".to_string()));
    }
}
