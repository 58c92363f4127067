use regex::{Captures, Regex};

/// An ordered list of candidate patterns for one field. Candidates are tried
/// in sequence and the first hit wins; later patterns never override an
/// earlier one. New candidates are appended without touching existing ones.
pub struct PatternChain {
    patterns: Vec<Regex>,
}

impl PatternChain {
    pub fn new(patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid pattern"))
            .collect();
        PatternChain { patterns }
    }

    /// First capture group of the first pattern that matches.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns
            .iter()
            .find_map(|re| re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str()))
    }

    /// Full capture set of the first pattern that matches, along with the
    /// index of the winning pattern.
    pub fn first_captures<'t>(&self, text: &'t str) -> Option<(usize, Captures<'t>)> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(i, re)| re.captures(text).map(|c| (i, c)))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pattern_wins() {
        let chain = PatternChain::new(&[r"(\d{4})", r"(\d{2})"]);
        assert_eq!(chain.first_match("in 2015 or 99"), Some("2015"));
    }

    #[test]
    fn falls_through_to_later_patterns() {
        let chain = PatternChain::new(&[r"(\d{4})", r"([A-Z][a-z]+)"]);
        assert_eq!(chain.first_match("just Words here"), Some("Words"));
    }

    #[test]
    fn no_match_is_none() {
        let chain = PatternChain::new(&[r"(\d+)"]);
        assert_eq!(chain.first_match("no digits"), None);
        assert!(!chain.is_match("no digits"));
    }

    #[test]
    fn winning_index_is_reported() {
        let chain = PatternChain::new(&[r"^a(x)", r"^b(x)"]);
        let (idx, caps) = chain.first_captures("bx").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(&caps[1], "x");
    }
}
