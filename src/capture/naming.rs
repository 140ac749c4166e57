//! Display-name derivation and filename sanitization.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error_handling::types::CaptureError;
use crate::storage::types::UNTITLED;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-.]").unwrap());

/// Best-effort lookup of a tab's current title, used only to name captures.
///
/// Failure here never aborts a capture; it only degrades the display name.
#[async_trait]
pub trait TabTitleSource: Send + Sync {
    async fn title(&self, tab_id: i64) -> Result<String, CaptureError>;
}

/// Replaces every character outside `[A-Za-z0-9_\-.]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// Derives a filesystem-safe display name from a tab title.
///
/// Strips a trailing `".pdf"` and then a trailing `" - Download"`, each
/// applied literally and once, then sanitizes. An empty result falls back
/// to the sentinel name.
pub fn derive_display_name(title: &str) -> String {
    let trimmed = title.strip_suffix(".pdf").unwrap_or(title);
    let trimmed = trimmed.strip_suffix(" - Download").unwrap_or(trimmed);
    let name = sanitize_filename(trimmed);
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("a b/c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("safe-name_1.0"), "safe-name_1.0");
        assert_eq!(sanitize_filename("日報 2024"), "___2024");
    }

    #[test]
    fn derive_strips_suffixes_then_sanitizes() {
        let name = derive_display_name("Quarterly Report - Download.pdf");
        assert_eq!(name, "Quarterly_Report");
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')));
    }

    #[test]
    fn suffixes_are_stripped_once_and_only_at_the_end() {
        assert_eq!(derive_display_name("notes.pdf.pdf"), "notes.pdf");
        assert_eq!(derive_display_name("report.pdf - final"), "report.pdf_-_final");
        assert_eq!(derive_display_name(" - Download"), UNTITLED);
    }

    #[test]
    fn empty_title_falls_back_to_sentinel() {
        assert_eq!(derive_display_name(""), UNTITLED);
        assert_eq!(derive_display_name(".pdf"), UNTITLED);
    }
}
