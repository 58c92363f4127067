use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::PatternChain;
use crate::parser::sections::{self, EDUCATION_KEYWORDS};
use crate::record::EducationEntry;
use crate::text::ExtractedText;

const DEGREE: &str = r"bachelor|master|ph\.?d|doctorate|associate|diploma|mba|b\.?sc|b\.?tech|b\.?e|b\.?s|b\.?a|m\.?sc|m\.?tech|m\.?s|m\.?a";
const INSTITUTION: &str = r"university|college|institute|school|academy";

/// Two orderings of the same combined pattern: degree first ("Bachelor of
/// Science - MIT University - 2015") and institution first ("MIT University
/// - Bachelor of Science, 2015"). Separators are spaced dashes or commas.
static ENTRY: LazyLock<PatternChain> = LazyLock::new(|| {
    let degree_first = format!(
        r"(?i)^((?:{DEGREE})\b[^-–—,|]*?)(?:\s+[-–—]\s+|,\s*)([^-–—,|]{{2,60}}?)(?:(?:\s+[-–—]\s+|,\s*)(.{{2,40}}))?$"
    );
    let institution_first = format!(
        r"(?i)^([^-–—,|]*?\b(?:{INSTITUTION})\b[^-–—,|]*?)(?:\s+[-–—]\s+|,\s*)((?:{DEGREE})\b[^-–—,|]*?)(?:(?:\s+[-–—]\s+|,\s*)(.{{2,40}}))?$"
    );
    PatternChain::new(&[&degree_first, &institution_first])
});

static GPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgpa\s*[:\-]?\s*([0-4](?:\.\d{1,2})?)\b").unwrap());

// GPA lines sit at most this far below the entry they belong to
const GPA_LOOKAHEAD: usize = 3;

pub fn extract(text: &ExtractedText) -> Vec<EducationEntry> {
    let Some(block) = sections::isolate_block(text.lines(), EDUCATION_KEYWORDS) else {
        return Vec::new();
    };

    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut starts: Vec<usize> = Vec::new();
    for (i, line) in block.iter().enumerate() {
        if let Some(entry) = match_entry(line) {
            entries.push(entry);
            starts.push(i);
        }
    }

    for (n, entry) in entries.iter_mut().enumerate() {
        let from = starts[n];
        let to = starts
            .get(n + 1)
            .copied()
            .unwrap_or(block.len())
            .min(from + GPA_LOOKAHEAD);
        entry.gpa = block[from..to]
            .iter()
            .find_map(|l| GPA_RE.captures(l).map(|c| c[1].to_string()));
    }

    entries
}

fn match_entry(line: &str) -> Option<EducationEntry> {
    let (idx, caps) = ENTRY.first_captures(line)?;
    let (degree, institution) = if idx == 0 {
        (caps[1].trim().to_string(), caps[2].trim().to_string())
    } else {
        (caps[2].trim().to_string(), caps[1].trim().to_string())
    };
    let year = caps.get(3).map(|m| m.as_str().trim().to_string());
    Some(EducationEntry {
        degree,
        institution,
        year,
        gpa: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn education(input: &str) -> Vec<EducationEntry> {
        extract(&ExtractedText::new(input.to_string()))
    }

    #[test]
    fn degree_first_ordering() {
        let entries = education("EDUCATION\nBachelor of Science - MIT University - 2015");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree, "Bachelor of Science");
        assert_eq!(entries[0].institution, "MIT University");
        assert_eq!(entries[0].year.as_deref(), Some("2015"));
    }

    #[test]
    fn institution_first_ordering() {
        let entries = education("EDUCATION\nMIT University - Bachelor of Science, 2015");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree, "Bachelor of Science");
        assert_eq!(entries[0].institution, "MIT University");
        assert_eq!(entries[0].year.as_deref(), Some("2015"));
    }

    #[test]
    fn comma_separated_entry() {
        let entries = education("EDUCATION\nBachelor of Arts, Yale University, 2010");
        assert_eq!(entries[0].degree, "Bachelor of Arts");
        assert_eq!(entries[0].institution, "Yale University");
        assert_eq!(entries[0].year.as_deref(), Some("2010"));
    }

    #[test]
    fn year_is_optional() {
        let entries = education("EDUCATION\nMaster of Arts - Oxford College");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].year, None);
    }

    #[test]
    fn abbreviated_degrees() {
        let entries = education("EDUCATION\nB.S. in Computer Science - Stanford University - 2018");
        assert_eq!(entries[0].degree, "B.S. in Computer Science");
        assert_eq!(entries[0].institution, "Stanford University");
    }

    #[test]
    fn gpa_on_entry_or_following_line() {
        let entries = education(
            "EDUCATION\n\
             B.S. in Computer Science - Stanford University - 2018\n\
             GPA: 3.9\n\
             MBA - Wharton School - 2022",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].gpa.as_deref(), Some("3.9"));
        assert_eq!(entries[1].gpa, None);
    }

    #[test]
    fn non_degree_lines_are_ignored() {
        let entries = education("EDUCATION\nDean's list, every semester\nGraduated with honors");
        assert!(entries.is_empty());
    }

    #[test]
    fn no_education_section_is_empty() {
        assert!(education("EXPERIENCE\nEngineer - Acme - 2020").is_empty());
        assert!(education("").is_empty());
    }

    #[test]
    fn multiple_entries_in_document_order() {
        let entries = education(
            "EDUCATION\n\
             Master of Science - CMU - 2020\n\
             Bachelor of Science - MIT University - 2015",
        );
        assert_eq!(entries.len(), 2);
        assert!(entries[0].degree.starts_with("Master"));
        assert!(entries[1].degree.starts_with("Bachelor"));
    }
}
