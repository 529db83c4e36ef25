//! Word tokenization shared by the classifier, labeler and term derivation.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Lowercase `\w+` tokens in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// True when some token is `term` or an inflection starting with it
/// (`leak` matches `leaking`, `leaked`).
pub fn mentions(tokens: &[String], term: &str) -> bool {
    tokens.iter().any(|t| t.starts_with(term))
}

/// True when some token mentions any of `terms`.
pub fn mentions_any(tokens: &[String], terms: &[&str]) -> bool {
    terms.iter().any(|term| mentions(tokens, term))
}
