//! HTML Export Generation
//!
//! Wraps the preview HTML in a standalone page. The page links the KaTeX and
//! highlight.js stylesheets from their CDNs and inlines a small base style
//! sheet, so the file renders the same when opened on its own.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::options::ExportFormat;
use crate::error::{Error, Result};
use crate::preview::{html_escape, PreviewRenderer};

const KATEX_CSS: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";
const HIGHLIGHT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/default.min.css";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build a complete HTML page around an already rendered body.
///
/// Pure string templating: the same body and title always give the same
/// bytes.
pub fn generate_html_document(body_html: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{katex}">
    <link rel="stylesheet" href="{highlight}">
    <style>
{base_css}
    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
        katex = KATEX_CSS,
        highlight = HIGHLIGHT_CSS,
        base_css = BASE_CSS,
        body = body_html,
    )
}

/// Rendered HTML without the page wrapper, for pasting into other apps.
pub fn generate_html_fragment(renderer: &PreviewRenderer, markdown: &str) -> String {
    renderer.render(markdown)
}

/// Render `markdown` and write the page to `markdown-preview.html` in
/// `output_dir`, which is created if missing. Returns the written path.
pub fn export_to_html_file(
    renderer: &PreviewRenderer,
    markdown: &str,
    title: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let html = generate_html_document(&renderer.render(markdown), title);
    let path = output_path(ExportFormat::HtmlFile, output_dir)?;

    write_export(&path, html.as_bytes())?;
    info!("Exported HTML to {}", path.display());
    Ok(path)
}

/// Output path of a file format inside `output_dir`.
pub(crate) fn output_path(format: ExportFormat, output_dir: &Path) -> Result<PathBuf> {
    format.output_path(output_dir).ok_or_else(|| {
        Error::Application(format!("{} does not produce a file", format.label()))
    })
}

/// Write an exported file, creating the parent directory first.
pub(crate) fn write_export(path: &Path, contents: &[u8]) -> Result<()> {
    let write_error = |source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for the exported page (layout, code, quotes, tables).
const BASE_CSS: &str = r#"        body {
            font-family: system-ui, -apple-system, sans-serif;
            line-height: 1.5;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
        }
        pre {
            background: #f8f9fa;
            padding: 1rem;
            border-radius: 0.375rem;
            overflow-x: auto;
        }
        code {
            font-family: ui-monospace, monospace;
        }
        blockquote {
            border-left: 4px solid #e5e7eb;
            margin-left: 0;
            padding-left: 1rem;
            color: #4b5563;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            margin: 1rem 0;
        }
        th, td {
            border: 1px solid #e5e7eb;
            padding: 0.5rem;
            text-align: left;
        }
        th {
            background: #f8f9fa;
        }"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
