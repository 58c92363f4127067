/// Keyword groups that mark resume section headings. A heading for one
/// group also terminates the block of any other group.
pub const SUMMARY_KEYWORDS: &[&str] = &["summary", "objective", "profile", "about", "overview"];
pub const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "employment",
    "work history",
    "professional experience",
    "career",
];
pub const EDUCATION_KEYWORDS: &[&str] = &["education", "academic", "qualifications", "degree"];
pub const SKILLS_KEYWORDS: &[&str] = &[
    "skills",
    "technical skills",
    "competencies",
    "expertise",
    "proficiencies",
];
pub const PROJECTS_KEYWORDS: &[&str] = &[
    "projects",
    "portfolio",
    "work samples",
    "personal projects",
    "side projects",
];

const ALL_GROUPS: &[&[&str]] = &[
    SUMMARY_KEYWORDS,
    EXPERIENCE_KEYWORDS,
    EDUCATION_KEYWORDS,
    SKILLS_KEYWORDS,
    PROJECTS_KEYWORDS,
];

// Longer than this a line is prose, not a heading
const MAX_HEADING_LEN: usize = 48;

/// True when the line reads as a section heading for one of `keywords`:
/// short, keyword present on a word boundary (case-insensitive), optional
/// trailing colon.
pub fn is_heading_for(line: &str, keywords: &[&str]) -> bool {
    let trimmed = line.trim().trim_end_matches(':').trim_end();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADING_LEN {
        return false;
    }
    let lower = trimmed.to_lowercase();
    keywords.iter().any(|kw| contains_word(&lower, kw))
}

/// True when the line is a recognized heading of any group.
pub fn is_any_heading(line: &str) -> bool {
    ALL_GROUPS.iter().any(|group| is_heading_for(line, group))
}

/// Block isolation: the lines between the first heading matching `keywords`
/// and the next recognized heading of any group (or end of text). `None`
/// when no such heading exists at all.
pub fn isolate_block(lines: &[String], keywords: &[&str]) -> Option<Vec<String>> {
    let start = lines.iter().position(|l| is_heading_for(l, keywords))?;
    let body = lines[start + 1..]
        .iter()
        .take_while(|l| !is_any_heading(l))
        .cloned()
        .collect();
    Some(body)
}

/// Substring search with word boundaries on both ends. `haystack` must
/// already be lowercased; keywords are lowercase ASCII.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let bytes = haystack.as_bytes();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let at = from + pos;
        let end = at + needle.len();
        let before_ok = at == 0 || !bytes[at - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        from = at + 1;
    }
    false
}
