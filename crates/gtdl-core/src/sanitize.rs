//! Filesystem-safe names for chapter, tutorial, and lesson titles.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// A name still contained characters outside the safe set after all rewrite
/// rules ran. Surfaced instead of truncating so an unexpected title shows up
/// as a hard failure, not as a mangled directory on disk.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not sanitized properly: '{0}'")]
pub struct SanitizeError(pub String);

// Colon after a word, as in "Chapter 1: Intro".
static COLON_AFTER_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b: ").unwrap());
static DIGIT_FRACTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)/(\d)").unwrap());
static DROPPED_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?!'.]").unwrap());
// Whitelist: letters, digits, hyphen, comma, space, parentheses, hash.
static SAFE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9, ()#-]+$").unwrap());

/// Rewrites `name` into a form safe for directory and file names.
///
/// Applied in order: `"word: "` becomes `"word - "`, `" & "` becomes
/// `" and "`, a digit fraction like `"3/4"` becomes `"3 over 4"`, and the
/// characters `? ! ' .` are removed. Anything left outside the whitelist is
/// an error carrying the offending string.
pub fn sanitize(name: &str) -> Result<String, SanitizeError> {
    let replaced_colon = COLON_AFTER_WORD.replace_all(name, " - ");
    let replaced_ampersand = replaced_colon.replace(" & ", " and ");
    let replaced_fraction = DIGIT_FRACTION.replace_all(&replaced_ampersand, "$1 over $2");
    let result = DROPPED_CHARS.replace_all(&replaced_fraction, "");

    if SAFE_NAME.is_match(&result) {
        Ok(result.into_owned())
    } else {
        Err(SanitizeError(result.into_owned()))
    }
}
