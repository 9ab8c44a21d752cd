//! Export formats
//!
//! The three ways a document leaves the editor and the fixed file names the
//! file-based ones are written under.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Standalone HTML page around the preview
    #[default]
    HtmlFile,
    /// Word-processor document
    Docx,
    /// Rendered HTML placed on the system clipboard
    ClipboardHtml,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::HtmlFile => "HTML File",
            ExportFormat::Docx => "Word Document",
            ExportFormat::ClipboardHtml => "Copy as HTML",
        }
    }

    /// Get the file extension for this format (if applicable).
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::HtmlFile => Some("html"),
            ExportFormat::Docx => Some("docx"),
            ExportFormat::ClipboardHtml => None,
        }
    }

    /// Fixed output file name; `None` for the clipboard.
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            ExportFormat::HtmlFile => Some("markdown-preview.html"),
            ExportFormat::Docx => Some("document.docx"),
            ExportFormat::ClipboardHtml => None,
        }
    }

    /// Where this format is written inside `dir`.
    pub fn output_path(&self, dir: &Path) -> Option<PathBuf> {
        self.file_name().map(|name| dir.join(name))
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::HtmlFile,
            ExportFormat::Docx,
            ExportFormat::ClipboardHtml,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            ExportFormat::HtmlFile.file_name(),
            Some("markdown-preview.html")
        );
        assert_eq!(ExportFormat::Docx.file_name(), Some("document.docx"));
        assert_eq!(ExportFormat::ClipboardHtml.file_name(), None);
    }

    #[test]
    fn test_extension_matches_file_name() {
        for format in ExportFormat::all() {
            match (format.extension(), format.file_name()) {
                (Some(ext), Some(name)) => assert!(name.ends_with(ext)),
                (None, None) => {}
                other => panic!("Inconsistent format {:?}: {:?}", format, other),
            }
        }
    }

    #[test]
    fn test_output_path() {
        let path = ExportFormat::Docx.output_path(Path::new("out")).unwrap();
        assert_eq!(path, Path::new("out").join("document.docx"));
        assert!(ExportFormat::ClipboardHtml
            .output_path(Path::new("out"))
            .is_none());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ExportFormat::HtmlFile).unwrap();
        assert_eq!(json, "\"htmlfile\"");
        let format: ExportFormat = serde_json::from_str("\"docx\"").unwrap();
        assert_eq!(format, ExportFormat::Docx);
    }

    #[test]
    fn test_labels_not_empty() {
        for format in ExportFormat::all() {
            assert!(!format.label().is_empty());
        }
    }
}
