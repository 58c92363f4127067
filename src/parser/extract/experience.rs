use std::sync::LazyLock;

use crate::parser::patterns::PatternChain;
use crate::parser::sections::{self, EXPERIENCE_KEYWORDS};
use crate::record::ExperienceEntry;
use crate::text::ExtractedText;

const MAX_DESCRIPTION_CHARS: usize = 300;

/// Job header line variants, tried in order: spaced-dash, "at", pipe.
/// Dashes must be spaced so hyphenated titles ("Front-End Developer") are
/// not split.
static HEADER: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::new(&[
        // Software Engineer - Google - 2019 to 2022
        r"^(.{2,60}?)\s+[-–—]\s+(.{2,60}?)\s+[-–—]\s+(.{2,40})$",
        // Software Engineer at Google (2019 - 2022) / at Google, 2019 - 2022
        r"^([A-Z].{1,59}?)\s+at\s+([A-Z].{1,59}?)(?:\s*[(,]\s*(.{2,40}?)\)?)?\s*$",
        // Software Engineer | Google | 2019 - 2022
        r"^(.{2,60}?)\s*\|\s*(.{2,60}?)\s*\|\s*(.{2,40})$",
    ])
});

pub fn extract(text: &ExtractedText) -> Vec<ExperienceEntry> {
    let Some(block) = sections::isolate_block(text.lines(), EXPERIENCE_KEYWORDS) else {
        return Vec::new();
    };

    let mut entries: Vec<ExperienceEntry> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in &block {
        if let Some((title, company, duration)) = match_header(line) {
            flush_description(&mut entries, &mut pending);
            entries.push(ExperienceEntry {
                title,
                company,
                duration,
                description: None,
            });
        } else if !entries.is_empty() {
            // text before the first job header is ignored
            pending.push(line);
        }
    }
    flush_description(&mut entries, &mut pending);

    entries
}

fn match_header(line: &str) -> Option<(String, String, Option<String>)> {
    let (idx, caps) = HEADER.first_captures(line)?;
    let title = caps[1].trim().to_string();
    let mut company = caps[2].trim().to_string();
    let mut duration = caps.get(3).map(|m| m.as_str().trim().to_string());

    if let Some(d) = duration.clone() {
        if !looks_like_duration(&d) {
            if idx == 1 {
                // "Engineer at Acme, Inc.": the tail belongs to the company
                company = format!("{company}, {d}");
                duration = None;
            } else {
                return None;
            }
        }
    }
    Some((title, company, duration))
}

/// A duration carries a digit or an open-ended marker; plain prose that
/// happens to contain two dashes does not become a job header.
fn looks_like_duration(s: &str) -> bool {
    let lower = s.to_lowercase();
    s.chars().any(|c| c.is_ascii_digit()) || lower.contains("present") || lower.contains("current")
}

fn flush_description(entries: &mut Vec<ExperienceEntry>, pending: &mut Vec<&str>) {
    if pending.is_empty() {
        return;
    }
    if let Some(last) = entries.last_mut() {
        last.description = Some(clip(&pending.join(" "), MAX_DESCRIPTION_CHARS));
    }
    pending.clear();
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(input: &str) -> Vec<ExperienceEntry> {
        extract(&ExtractedText::new(input.to_string()))
    }

    #[test]
    fn dash_separated_header() {
        let jobs = experience("EXPERIENCE\nSoftware Engineer - Google - 2019 to 2022");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Software Engineer");
        assert_eq!(jobs[0].company, "Google");
        assert_eq!(jobs[0].duration.as_deref(), Some("2019 to 2022"));
    }

    #[test]
    fn at_separated_header() {
        let jobs = experience("EXPERIENCE\nData Engineer at Spotify (2020 - 2023)");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Data Engineer");
        assert_eq!(jobs[0].company, "Spotify");
        assert_eq!(jobs[0].duration.as_deref(), Some("2020 - 2023"));
    }

    #[test]
    fn pipe_separated_header() {
        let jobs = experience("EXPERIENCE\nSRE | Netflix | 2021 - present");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "SRE");
        assert_eq!(jobs[0].company, "Netflix");
        assert_eq!(jobs[0].duration.as_deref(), Some("2021 - present"));
    }

    #[test]
    fn hyphenated_title_is_not_split() {
        let jobs = experience("EXPERIENCE\nFront-End Developer - Acme - 2020 - 2022");
        assert_eq!(jobs[0].title, "Front-End Developer");
        assert_eq!(jobs[0].company, "Acme");
    }

    #[test]
    fn company_suffix_is_not_a_duration() {
        let jobs = experience("EXPERIENCE\nEngineer at Acme, Inc.");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme, Inc.");
        assert_eq!(jobs[0].duration, None);
    }

    #[test]
    fn description_accumulates_until_next_header() {
        let jobs = experience(
            "EXPERIENCE\n\
             Engineer - Acme - 2020 - 2022\n\
             Built the data pipeline.\n\
             Cut costs by half.\n\
             Analyst - Initech - 2018 - 2020\n\
             Made reports.",
        );
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].description.as_deref(),
            Some("Built the data pipeline. Cut costs by half.")
        );
        assert_eq!(jobs[1].description.as_deref(), Some("Made reports."));
    }

    #[test]
    fn description_is_truncated_with_ellipsis() {
        let long = "word ".repeat(100);
        let jobs = experience(&format!("EXPERIENCE\nEngineer - Acme - 2020\n{long}"));
        let desc = jobs[0].description.as_deref().unwrap();
        assert_eq!(desc.chars().count(), MAX_DESCRIPTION_CHARS + 3);
        assert!(desc.ends_with("..."));
    }

    #[test]
    fn block_stops_at_education_heading() {
        let jobs = experience(
            "EXPERIENCE\n\
             Engineer - Acme - 2020 - 2022\n\
             Shipped the billing system.\n\
             EDUCATION\n\
             Bachelor of Science - MIT University - 2015",
        );
        assert_eq!(jobs.len(), 1);
        let desc = jobs[0].description.as_deref().unwrap();
        assert!(!desc.contains("Bachelor"));
        assert!(!desc.contains("MIT"));
    }

    #[test]
    fn prose_with_dashes_is_not_a_header() {
        let jobs = experience(
            "EXPERIENCE\n\
             Engineer - Acme - 2020\n\
             Owned intake - triage - and rollout processes.",
        );
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].description.as_deref().unwrap().contains("triage"));
    }

    #[test]
    fn no_experience_section_is_empty() {
        assert!(experience("SKILLS\nPython").is_empty());
        assert!(experience("").is_empty());
    }
}
