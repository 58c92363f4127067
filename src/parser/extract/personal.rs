use std::sync::LazyLock;

use regex::Regex;

use crate::parser::sections::{self, SUMMARY_KEYWORDS};
use crate::record::PersonalInfo;
use crate::text::ExtractedText;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
// Requires a full 10-digit shape so year ranges like "2015 - 2019" stay out
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});
static LINKEDIN_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_%-]+/?").unwrap()
});
static LINKEDIN_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blinkedin\s*[:\-]\s*@?([A-Za-z0-9_-]+)\b").unwrap());
static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_-]+/?").unwrap()
});
static GITHUB_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgithub\s*[:\-]\s*@?([A-Za-z0-9_-]+)\b").unwrap());
// Two or three capitalized words, no digits, no @
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z'.-]+(?:\s+[A-Z][A-Za-z'.-]+){1,2}$").unwrap()
});
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Za-z .'-]{1,30}),\s*([A-Z][A-Za-z .'-]{0,30})$").unwrap()
});
static INLINE_SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\b(?:summary|objective|profile|about|overview)\b\s*[:\-]?\s*(.{50,500})")
        .unwrap()
});

const SUMMARY_MIN_CHARS: usize = 50;
const SUMMARY_MAX_CHARS: usize = 500;
const NAME_SCAN_LINES: usize = 5;
const LOCATION_SCAN_LINES: usize = 10;

pub fn extract(text: &ExtractedText) -> PersonalInfo {
    PersonalInfo {
        name: find_name(text.lines()),
        email: find_plain(&EMAIL_RE, text.raw()),
        phone: find_plain(&PHONE_RE, text.raw()),
        location: find_location(text.lines()),
        summary: find_summary(text),
        linkedin: find_linkedin(text.raw()),
        github: find_github(text.raw()),
    }
}

fn find_plain(re: &Regex, raw: &str) -> Option<String> {
    re.find(raw).map(|m| m.as_str().trim().to_string())
}

/// First early line that looks like a person's name. Section headings are
/// skipped so a resume that opens with "Professional Experience" does not
/// get that as a name.
fn find_name(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .find(|l| NAME_RE.is_match(l) && !sections::is_any_heading(l))
        .cloned()
}

/// Loose "City, Region" pattern over the header lines.
fn find_location(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .take(LOCATION_SCAN_LINES)
        .filter(|l| !sections::is_any_heading(l))
        .find_map(|l| {
            LOCATION_RE
                .captures(l)
                .map(|c| format!("{}, {}", c[1].trim(), c[2].trim()))
        })
}

/// Prose following a summary-group heading, clamped to 50..500 characters.
/// Without such a heading, an inline keyword-anchored capture is tried.
fn find_summary(text: &ExtractedText) -> Option<String> {
    let body = sections::isolate_block(text.lines(), SUMMARY_KEYWORDS)
        .map(|ls| ls.join(" "))
        .filter(|s| !s.is_empty())
        .or_else(|| {
            INLINE_SUMMARY_RE
                .captures(text.raw())
                .map(|c| c[1].trim().to_string())
        })?;
    let clamped: String = body.chars().take(SUMMARY_MAX_CHARS).collect();
    (clamped.chars().count() >= SUMMARY_MIN_CHARS).then_some(clamped)
}

fn find_linkedin(raw: &str) -> Option<String> {
    if let Some(m) = LINKEDIN_URL_RE.find(raw) {
        return Some(ensure_scheme(m.as_str()));
    }
    LINKEDIN_HANDLE_RE
        .captures(raw)
        .map(|c| format!("https://linkedin.com/in/{}", &c[1]))
}

fn find_github(raw: &str) -> Option<String> {
    if let Some(m) = GITHUB_URL_RE.find(raw) {
        return Some(ensure_scheme(m.as_str()));
    }
    GITHUB_HANDLE_RE
        .captures(raw)
        .map(|c| format!("https://github.com/{}", &c[1]))
}

fn ensure_scheme(url: &str) -> String {
    if url.to_ascii_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
