//! Namespace identifier rules.
//!
//! Identifiers are backslash-delimited (`Vendor\Package\Sub`) and may only
//! contain ASCII word characters and separators. Leading and trailing
//! separators carry no meaning and are trimmed away.

use regex::Regex;
use std::sync::LazyLock;

/// The namespace separator.
pub const SEPARATOR: char = '\\';

static VALID_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_\\]*$").expect("identifier pattern compiles"));

/// Returns true when `id` only contains word characters and separators.
///
/// The empty string is accepted here; callers that need a non-empty
/// identifier check the trimmed form.
pub fn is_valid(id: &str) -> bool {
    VALID_ID.is_match(id)
}

/// Strips leading and trailing separators.
pub fn trim(id: &str) -> &str {
    id.trim_matches(SEPARATOR)
}

/// Returns `id` with its last segment removed, or `None` for a root-level identifier.
pub fn parent(id: &str) -> Option<&str> {
    id.rfind(SEPARATOR).map(|pos| &id[..pos])
}

/// Joins a child segment onto a parent identifier.
pub fn join(parent: &str, child: &str) -> String {
    format!("{}{}{}", parent, SEPARATOR, child)
}
