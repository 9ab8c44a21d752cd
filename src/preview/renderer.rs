//! Markdown to HTML for the live preview
//!
//! The whole source is re-rendered on every call. After comrak parses the
//! text, two passes rewrite the tree before HTML formatting:
//!
//! 1. text nodes containing `$...$` / `$$...$$` become raw markup with the
//!    math rendered (or the original text kept, if rendering fails)
//! 2. fenced code with a known language becomes syntect-highlighted markup

use comrak::{
    nodes::{AstNode, NodeValue},
    Arena,
};
use log::{debug, warn};

use crate::config::Settings;
use crate::markdown::math::{render_or_fallback, split_math, MathMlRenderer, MathRenderer, MathSegment};
use crate::markdown::syntax::{get_highlighter, DEFAULT_LIGHT_THEME};
use crate::markdown::{parse, MarkdownOptions};

// ─────────────────────────────────────────────────────────────────────────────
// Preview Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Renders Markdown source to an HTML fragment.
pub struct PreviewRenderer {
    options: MarkdownOptions,
    math: Box<dyn MathRenderer>,
    syntax_theme: String,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    /// Renderer with GFM extensions, hard line breaks and MathML output.
    pub fn new() -> Self {
        Self {
            options: MarkdownOptions::default(),
            math: Box::new(MathMlRenderer),
            syntax_theme: DEFAULT_LIGHT_THEME.to_string(),
        }
    }

    /// Renderer configured from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let options = MarkdownOptions {
            hard_breaks: settings.hard_breaks,
            ..MarkdownOptions::default()
        };
        Self::new()
            .with_options(options)
            .with_syntax_theme(&settings.syntax_theme)
    }

    /// Replace the parse options.
    pub fn with_options(mut self, options: MarkdownOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the math renderer.
    pub fn with_math_renderer(mut self, math: Box<dyn MathRenderer>) -> Self {
        self.math = math;
        self
    }

    /// Set the syntect theme for code blocks.
    pub fn with_syntax_theme(mut self, theme: &str) -> Self {
        self.syntax_theme = theme.to_string();
        self
    }

    /// Parse options in use, shared with the document exporter.
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Render `markdown` to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let arena = Arena::new();
        let root = parse(&arena, markdown, &self.options);

        merge_adjacent_text(root);
        self.render_math(root);
        self.highlight_code(root);

        let mut html = Vec::new();
        if let Err(e) = comrak::format_html(root, &self.options.to_comrak_options(), &mut html) {
            warn!("Failed to format preview HTML: {}", e);
        }
        String::from_utf8_lossy(&html).into_owned()
    }

    fn render_math<'a>(&self, root: &'a AstNode<'a>) {
        let text_nodes: Vec<_> = root
            .descendants()
            .filter(|node| matches!(node.data.borrow().value, NodeValue::Text(_)))
            .filter(|node| !inside_image(node))
            .collect();

        for node in text_nodes {
            let markup = match &node.data.borrow().value {
                NodeValue::Text(text) => self.math_markup(text),
                _ => None,
            };
            if let Some(markup) = markup {
                // Raw markup node: comrak writes its literal verbatim
                node.data.borrow_mut().value = NodeValue::HtmlInline(markup);
            }
        }
    }

    /// Markup for a text node, or `None` when it holds no math.
    fn math_markup(&self, text: &str) -> Option<String> {
        let segments = split_math(text);
        if !segments
            .iter()
            .any(|segment| matches!(segment, MathSegment::Math { .. }))
        {
            return None;
        }

        let mut markup = String::with_capacity(text.len() * 2);
        for segment in segments {
            match segment {
                MathSegment::Text(plain) => markup.push_str(&html_escape(plain)),
                MathSegment::Math { tex, display, raw } => {
                    match render_or_fallback(self.math.as_ref(), tex, display, raw) {
                        Ok(rendered) => markup.push_str(&rendered),
                        Err(original) => markup.push_str(&html_escape(&original)),
                    }
                }
            }
        }
        Some(markup)
    }

    fn highlight_code<'a>(&self, root: &'a AstNode<'a>) {
        let highlighter = get_highlighter();

        for node in root.descendants() {
            let highlighted = match &node.data.borrow().value {
                NodeValue::CodeBlock(code) => {
                    let lang = code.info.split_whitespace().next().unwrap_or("");
                    highlighter.highlight_to_html(&code.literal, lang, &self.syntax_theme)
                }
                _ => None,
            };
            if let Some(html) = highlighted {
                debug!("Highlighted code block ({} bytes)", html.len());
                node.data.borrow_mut().value = NodeValue::HtmlInline(html);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Join runs of sibling text nodes so a math span is never split across nodes.
fn merge_adjacent_text<'a>(root: &'a AstNode<'a>) {
    let run_starts: Vec<_> = root
        .descendants()
        .filter(|node| is_text(node) && !node.previous_sibling().is_some_and(is_text))
        .collect();

    for node in run_starts {
        while let Some(next) = node.next_sibling() {
            let tail = match &next.data.borrow().value {
                NodeValue::Text(text) => text.clone(),
                _ => break,
            };
            if let NodeValue::Text(text) = &mut node.data.borrow_mut().value {
                text.push_str(&tail);
            }
            next.detach();
        }
    }
}

fn is_text<'a>(node: &'a AstNode<'a>) -> bool {
    matches!(node.data.borrow().value, NodeValue::Text(_))
}

/// Image alt text is emitted as an attribute, so it must stay plain.
fn inside_image<'a>(node: &'a AstNode<'a>) -> bool {
    node.ancestors()
        .any(|ancestor| matches!(ancestor.data.borrow().value, NodeValue::Image(_)))
}

/// HTML-escape a string.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::MathResult;

    struct FailingRenderer;

    impl MathRenderer for FailingRenderer {
        fn render(&self, tex: &str, _display: bool) -> MathResult {
            MathResult::Failed {
                original: tex.to_string(),
                reason: "parse error".to_string(),
            }
        }
    }

    struct TagRenderer;

    impl MathRenderer for TagRenderer {
        fn render(&self, tex: &str, display: bool) -> MathResult {
            MathResult::Rendered(format!("<m display=\"{}\">{}</m>", display, tex))
        }
    }

    #[test]
    fn test_render_heading_and_inline_math() {
        let html = PreviewRenderer::new().render("# Title\n\nHello $x^2$ world");

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Hello <span class=\"math math-inline\">"));
        assert!(html.contains("<math"));
        assert!(html.contains("</span> world</p>"));
    }

    #[test]
    fn test_render_display_math() {
        let html = PreviewRenderer::new()
            .with_math_renderer(Box::new(TagRenderer))
            .render("$$a+b$$");
        assert_eq!(html, "<p><m display=\"true\">a+b</m></p>\n");
    }

    #[test]
    fn test_math_failure_keeps_original_text() {
        let html = PreviewRenderer::new()
            .with_math_renderer(Box::new(FailingRenderer))
            .render("Hello $x <y$ world");
        assert_eq!(html, "<p>Hello $x &lt;y$ world</p>\n");
    }

    #[test]
    fn test_unbalanced_dollar_is_literal() {
        let html = PreviewRenderer::new().render("Price is $5 today");
        assert_eq!(html, "<p>Price is $5 today</p>\n");
    }

    #[test]
    fn test_plain_text_around_math_is_escaped() {
        let html = PreviewRenderer::new()
            .with_math_renderer(Box::new(TagRenderer))
            .render("a < b and $c$");
        assert!(html.contains("a &lt; b and <m display=\"false\">c</m>"));
    }

    #[test]
    fn test_math_in_inline_code_untouched() {
        let html = PreviewRenderer::new()
            .with_math_renderer(Box::new(TagRenderer))
            .render("`$x$`");
        assert_eq!(html, "<p><code>$x$</code></p>\n");
    }

    #[test]
    fn test_hard_breaks() {
        let html = PreviewRenderer::new().render("line one\nline two");
        assert!(html.contains("line one<br />"));

        let soft = PreviewRenderer::new()
            .with_options(MarkdownOptions {
                hard_breaks: false,
                ..MarkdownOptions::default()
            })
            .render("line one\nline two");
        assert!(!soft.contains("<br"));
    }

    #[test]
    fn test_known_language_is_highlighted() {
        let html = PreviewRenderer::new().render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre style="));
        assert!(!html.contains("language-rust"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let html = PreviewRenderer::new().render("```nosuchlang\nx < y\n```");
        assert!(html.contains("<pre><code class=\"language-nosuchlang\">x &lt; y"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = PreviewRenderer::new();
        let source = "# A\n\n| x | y |\n|---|---|\n| 1 | $2$ |";
        assert_eq!(renderer.render(source), renderer.render(source));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }
}
