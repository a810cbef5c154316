//! Text helpers shared by the importers: slugs, excerpts, media paths and
//! lenient timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum excerpt length in characters, before the ellipsis
pub const EXCERPT_LENGTH: usize = 200;

static MARKUP_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[#*`_\[\]()]").expect("valid markup regex")
});

/// Derive a URL slug from free text.
///
/// Non-ASCII text is transliterated first (`Café` becomes `Cafe`). Then ASCII
/// letters, digits and underscores are kept, runs of whitespace and hyphens
/// become a single `-`, everything else is dropped, the result is lowercased
/// and leading and trailing `-` and `_` are trimmed.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Whether `slug` is safe to use as a URL segment and file name: non-empty
/// and made only of ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Derive a plain-text excerpt from a Markdown body.
///
/// Markup characters `#*\`_[]()` are removed and whitespace collapsed. Text
/// longer than [`EXCERPT_LENGTH`] is cut at that length, then back to the last
/// space, and `...` is appended.
pub fn excerpt(markdown: &str) -> String {
    let stripped = MARKUP_CHARS.replace_all(markdown, "");
    let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    let head = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{}...", head)
}

/// Remove the public media prefix from a path, if present.
///
/// `"/media/team_images/a.jpg"` becomes `"team_images/a.jpg"`. Other paths are
/// returned unchanged. Empty paths yield `None`.
pub fn strip_media_prefix(path: &str, prefix: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let relative = path.strip_prefix(prefix).unwrap_or(path);
    if relative.is_empty() {
        None
    } else {
        Some(relative.to_string())
    }
}

/// Parse a timestamp written by an author.
///
/// Accepts RFC 3339 (including a trailing `Z`), naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` or `YYYY-MM-DD HH:MM:SS` taken as UTC, and a
/// bare `YYYY-MM-DD` meaning midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
