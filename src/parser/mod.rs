pub mod extract;
pub mod patterns;
pub mod sections;
pub mod vocab;

use crate::record::ResumeRecord;
use crate::text::ExtractedText;

/// Runs the five field extractors over the same text and composes the
/// record. The extractors are independent and read-only; one that finds
/// nothing contributes its empty value rather than an error, so text
/// that matches nothing still yields a structurally valid record.
pub fn parse(text: &ExtractedText) -> ResumeRecord {
    ResumeRecord {
        personal: extract::personal::extract(text),
        experience: extract::experience::extract(text),
        education: extract::education::extract(text),
        skills: extract::skills::extract(text),
        projects: extract::projects::extract(text),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(input: &str) -> ResumeRecord {
        parse(&ExtractedText::new(input.to_string()))
    }

    #[test]
    fn full_resume_end_to_end() {
        let record = parse_str(
            "John Smith\njohn.smith@mail.com\n555-123-4567\n\nSUMMARY\nExperienced engineer \
             with a passion for scalable systems and ten years in the field.\n\nSKILLS\n\
             JavaScript, React, Python\n\nEDUCATION\nBachelor of Science - MIT University - 2015",
        );

        assert_eq!(record.personal.name.as_deref(), Some("John Smith"));
        assert_eq!(record.personal.email.as_deref(), Some("john.smith@mail.com"));
        assert_eq!(record.personal.phone.as_deref(), Some("555-123-4567"));
        let summary = record.personal.summary.as_deref().unwrap_or("");
        assert!(summary.contains("Experienced engineer"));
        for skill in ["JavaScript", "React", "Python"] {
            assert!(record.skills.contains(skill), "missing skill {skill}");
        }
        assert_eq!(record.education.len(), 1);
        assert!(record.education[0].degree.contains("Bachelor"));
        assert!(record.education[0].institution.contains("MIT"));
    }

    #[test]
    fn empty_text_yields_empty_record() {
        assert!(parse_str("").is_empty());
        assert!(parse_str("\n\n   \n").is_empty());
    }

    #[test]
    fn unmatched_text_yields_empty_record_not_an_error() {
        let record = parse_str("lorem ipsum dolor sit amet\nconsectetur adipiscing elit");
        assert!(record.experience.is_empty());
        assert!(record.education.is_empty());
        assert!(record.skills.is_empty());
        assert!(record.projects.is_empty());
    }

    #[test]
    fn parsing_twice_gives_equal_records() {
        let text = ExtractedText::new(
            "Jane Doe\njane@site.org\n\nSKILLS\nRust, Docker, PostgreSQL".to_string(),
        );
        assert_eq!(parse(&text), parse(&text));
    }

    #[test]
    fn sample_resume_fixture() {
        let raw = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
        let record = parse(&ExtractedText::new(raw));

        assert_eq!(record.personal.name.as_deref(), Some("Sarah Connor"));
        assert_eq!(
            record.personal.email.as_deref(),
            Some("sarah.connor@techmail.com")
        );
        assert_eq!(record.personal.phone.as_deref(), Some("(415) 555-0192"));
        assert_eq!(
            record.personal.location.as_deref(),
            Some("San Francisco, California")
        );
        assert_eq!(
            record.personal.linkedin.as_deref(),
            Some("https://linkedin.com/in/sarahconnor")
        );
        assert_eq!(
            record.personal.github.as_deref(),
            Some("https://github.com/sconnor")
        );
        assert!(record
            .personal
            .summary
            .as_deref()
            .unwrap_or("")
            .starts_with("Backend engineer"));

        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].title, "Senior Software Engineer");
        assert_eq!(record.experience[0].company, "Initech");
        assert_eq!(record.experience[0].duration.as_deref(), Some("2020 - Present"));
        assert!(record.experience[0]
            .description
            .as_deref()
            .unwrap_or("")
            .contains("billing platform"));
        assert_eq!(record.experience[1].company, "Hooli");

        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].institution, "Stanford University");
        assert_eq!(record.education[0].gpa.as_deref(), Some("3.8"));

        for skill in ["Python", "Go", "PostgreSQL", "Docker", "Kubernetes", "AWS"] {
            assert!(record.skills.contains(skill), "missing skill {skill}");
        }

        assert_eq!(record.projects.len(), 1);
        assert_eq!(record.projects[0].name, "Flight Tracker");
        assert_eq!(
            record.projects[0].technologies.as_deref(),
            Some("Go, WebSockets, Redis")
        );
        assert_eq!(
            record.projects[0].link.as_deref(),
            Some("https://flights.example.dev")
        );
    }
}
