/// Text pulled out of an uploaded document, plus the line view the field
/// extractors work from. Lines are trimmed and blank lines are dropped.
/// There is no mutation API, so the line view always agrees with the raw
/// string it was derived from.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    raw: String,
    lines: Vec<String>,
}

impl ExtractedText {
    pub fn new(raw: String) -> Self {
        let lines = raw
            .replace("\r\n", "\n")
            .split('\n')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        ExtractedText { raw, lines }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when no non-blank content survived trimming.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.raw.chars().count()
    }
}
