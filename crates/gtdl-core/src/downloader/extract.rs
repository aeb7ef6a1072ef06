//! URL extraction from inline click-handler attributes.
//!
//! Lesson pages embed navigation in `onclick` handlers instead of plain
//! links. Two shapes occur: `window.open('<url>')` on the video download
//! button, and `window.open('<url>','Lesson Print Window',...)` on the
//! notation button. The character right after the closing quote (paren vs
//! comma) keeps the two patterns apart.

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_PAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"open\('([^']*)'\)").unwrap());
static NOTATION_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"open\('([^']*)',").unwrap());

/// Extracts the download-page URL from the video button's click handler.
pub fn video_page_url(onclick: &str) -> Option<&str> {
    VIDEO_PAGE_URL
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts the PDF URL from the notation button's click handler.
pub fn notation_url(onclick: &str) -> Option<&str> {
    NOTATION_URL
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_ONCLICK: &str = "window.open('/downloadgenerator.php?input=21986')";
    const NOTATION_ONCLICK: &str =
        "window.open('/lessonpdf3.php?trick_id=22361','Lesson Print Window','width=750,height=600')";

    #[test]
    fn video_pattern_matches_video_handler() {
        assert_eq!(
            video_page_url(VIDEO_ONCLICK),
            Some("/downloadgenerator.php?input=21986")
        );
    }

    #[test]
    fn notation_pattern_matches_notation_handler() {
        assert_eq!(
            notation_url(NOTATION_ONCLICK),
            Some("/lessonpdf3.php?trick_id=22361")
        );
    }

    #[test]
    fn video_pattern_rejects_notation_handler() {
        assert_eq!(video_page_url(NOTATION_ONCLICK), None);
    }

    #[test]
    fn notation_pattern_rejects_video_handler() {
        assert_eq!(notation_url(VIDEO_ONCLICK), None);
    }

    #[test]
    fn unrelated_handler_matches_neither() {
        assert_eq!(video_page_url("toggleMenu()"), None);
        assert_eq!(notation_url("toggleMenu()"), None);
    }
}
