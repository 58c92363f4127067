use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::PatternChain;
use crate::parser::sections::{self, PROJECTS_KEYWORDS};
use crate::record::ProjectEntry;
use crate::text::ExtractedText;

/// "name - description" pairs in the three shapes seen in the wild:
/// spaced dash, colon, pipe. The description half must carry some real
/// text so "Tools - 2020" style lines do not become projects.
static PAIR: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::new(&[
        r"^(.{2,50}?)\s+[-–—]\s+(.{10,})$",
        r"^(.{2,50}?):\s+(.{10,})$",
        r"^(.{2,50}?)\s*\|\s*(.{10,})$",
    ])
});

/// "Technologies: ..." / "Link: ..." lines detail the previous project
/// rather than start a new one. The separator is required so a project
/// actually named "Demo Reel" or "Link Shortener" is not misread.
static DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:technologies|tech\s+stack|built\s+with|link|url|demo|live\s+demo)\s*[:\-]")
        .unwrap()
});

static TECH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:technologies|tech\s+stack|built\s+with)\s*[:\-]?\s*(.+?)(?:\.\s|\.$|;|\s+(?:link|url|demo|live)\b|$)",
    )
    .unwrap()
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s,)\]>]+").unwrap());

pub fn extract(text: &ExtractedText) -> Vec<ProjectEntry> {
    let Some(block) = sections::isolate_block(text.lines(), PROJECTS_KEYWORDS) else {
        return Vec::new();
    };

    let mut projects: Vec<ProjectEntry> = Vec::new();
    for line in &block {
        if !DETAIL_RE.is_match(line) {
            if let Some((_, caps)) = PAIR.first_captures(line) {
                projects.push(ProjectEntry {
                    name: caps[1].trim().to_string(),
                    description: caps[2].trim().to_string(),
                    technologies: None,
                    link: None,
                });
                continue;
            }
        }
        // detail or continuation line for the entry above, if any
        if let Some(last) = projects.last_mut() {
            last.description.push(' ');
            last.description.push_str(line);
        }
    }

    for project in &mut projects {
        project.technologies = TECH_RE
            .captures(&project.description)
            .map(|c| c[1].trim().to_string());
        project.link = LINK_RE
            .find(&project.description)
            .map(|m| normalize_link(m.as_str()));
    }

    projects
}

fn normalize_link(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['.', ';', ',']);
    if trimmed.to_ascii_lowercase().starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
