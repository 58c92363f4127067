use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::vocab::SKILL_VOCABULARY;
use crate::text::ExtractedText;

struct SkillMatcher {
    name: &'static str,
    variants: Vec<Regex>,
}

static MATCHERS: LazyLock<Vec<SkillMatcher>> = LazyLock::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|&name| SkillMatcher {
            name,
            variants: build_variants(name),
        })
        .collect()
});

/// Vocabulary entries found anywhere in the text, under their canonical
/// spelling. The whole text is scanned rather than a skills section, so the
/// result depends only on which entries appear, not on where.
pub fn extract(text: &ExtractedText) -> BTreeSet<String> {
    let haystack = text.raw();
    MATCHERS
        .iter()
        .filter(|m| m.variants.iter().any(|re| re.is_match(haystack)))
        .map(|m| m.name.to_string())
        .collect()
}

/// Three candidate patterns per entry, tried loosest-last: exact spelling on
/// word boundaries, separator-flexible ("node js", "node-js", "nodejs"),
/// case-folded exact spelling.
fn build_variants(name: &str) -> Vec<Regex> {
    let exact = bounded(&regex::escape(name), name);
    let relaxed = bounded(&separator_flexible(name), name);
    vec![
        Regex::new(&exact).unwrap(),
        Regex::new(&format!("(?i){relaxed}")).unwrap(),
        Regex::new(&format!("(?i){exact}")).unwrap(),
    ]
}

/// Wrap a pattern in word boundaries. `\b` misbehaves next to leading or
/// trailing symbols (C++, C#, .NET), so those edges get explicit guards.
fn bounded(core: &str, name: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let lead = if name.chars().next().is_some_and(is_word) {
        r"\b"
    } else {
        r"(?:^|[^A-Za-z0-9_])"
    };
    let tail = if name.chars().last().is_some_and(is_word) {
        r"\b"
    } else {
        r"(?:$|[^A-Za-z0-9_])"
    };
    format!("{lead}{core}{tail}")
}

/// Separator characters in the entry become interchangeable or removable:
/// "Node.js" also matches "Node js", "node-js" and "nodejs".
fn separator_flexible(name: &str) -> String {
    let parts: Vec<String> = name
        .split([' ', '.', '-', '/'])
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    parts.join(r"[\s._/-]?")
}
