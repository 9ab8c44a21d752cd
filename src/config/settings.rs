//! User settings for markport
//!
//! This module defines the `Settings` struct that holds every user-configurable
//! option of the exporters, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::markdown::syntax::DEFAULT_LIGHT_THEME;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// All fields use `#[serde(default)]` so older or partial config files load
/// cleanly, with missing fields taking their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory exported files are written to (current directory if unset)
    pub output_dir: Option<PathBuf>,

    /// Open the exported file with the system viewer after a successful export
    pub open_after_export: bool,

    /// syntect theme used for code blocks in the preview
    pub syntax_theme: String,

    /// Render single newlines as `<br>` in the preview
    pub hard_breaks: bool,

    /// How long the "saved" confirmation stays up after an HTML export
    pub save_confirmation_ms: u64,

    /// `<title>` of the exported HTML document
    pub html_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            open_after_export: false,
            syntax_theme: DEFAULT_LIGHT_THEME.to_string(),
            hard_breaks: true,
            save_confirmation_ms: Self::DEFAULT_SAVE_CONFIRMATION_MS,
            html_title: "Markdown Preview".to_string(),
        }
    }
}

impl Settings {
    /// Default lifetime of the save confirmation flag.
    pub const DEFAULT_SAVE_CONFIRMATION_MS: u64 = 2000;
    /// Minimum save confirmation lifetime.
    pub const MIN_SAVE_CONFIRMATION_MS: u64 = 100;
    /// Maximum save confirmation lifetime.
    pub const MAX_SAVE_CONFIRMATION_MS: u64 = 60_000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Config files can be edited by hand, so anything loaded from disk goes
    /// through here before use.
    pub fn sanitize(&mut self) {
        self.save_confirmation_ms = self
            .save_confirmation_ms
            .clamp(Self::MIN_SAVE_CONFIRMATION_MS, Self::MAX_SAVE_CONFIRMATION_MS);

        if self.syntax_theme.trim().is_empty() {
            self.syntax_theme = DEFAULT_LIGHT_THEME.to_string();
        }

        if self.html_title.trim().is_empty() {
            self.html_title = Settings::default().html_title;
        }

        // An empty path means "not configured"
        if matches!(&self.output_dir, Some(dir) if dir.as_os_str().is_empty()) {
            self.output_dir = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Directory exports are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.output_dir, None);
        assert!(!settings.open_after_export);
        assert!(settings.hard_breaks);
        assert_eq!(settings.save_confirmation_ms, 2000);
        assert_eq!(settings.html_title, "Markdown Preview");
        assert_eq!(settings.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("/tmp/exports")),
            open_after_export: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"open_after_export": true}"#).unwrap();
        assert!(settings.open_after_export);
        assert!(settings.hard_breaks);
        assert_eq!(settings.syntax_theme, DEFAULT_LIGHT_THEME);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_save_confirmation() {
        let mut settings = Settings {
            save_confirmation_ms: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.save_confirmation_ms, Settings::MIN_SAVE_CONFIRMATION_MS);

        settings.save_confirmation_ms = u64::MAX;
        settings.sanitize();
        assert_eq!(settings.save_confirmation_ms, Settings::MAX_SAVE_CONFIRMATION_MS);
    }

    #[test]
    fn test_sanitize_blank_strings() {
        let mut settings = Settings {
            syntax_theme: "  ".to_string(),
            html_title: String::new(),
            output_dir: Some(PathBuf::new()),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.syntax_theme, DEFAULT_LIGHT_THEME);
        assert_eq!(settings.html_title, "Markdown Preview");
        assert_eq!(settings.output_dir, None);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"save_confirmation_ms": 5}"#).unwrap();
        assert_eq!(settings.save_confirmation_ms, Settings::MIN_SAVE_CONFIRMATION_MS);
    }
}
