//! Fallback keyword extraction, ported verbatim from
//! `dynamic_category_system.py::_extract_keywords`: lowercase, strip a small
//! stopword set, keep words longer than 3 chars, dedup preserving
//! first-seen order, cap at 20.

use via_domain::category::MAX_KEYWORDS;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
    "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see", "two",
    "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "with", "that",
    "this", "from", "have", "what", "when", "where", "which", "their", "there", "these", "those",
    "will", "would", "about", "into", "than",
];

pub fn fallback_extract(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        let word = raw.to_lowercase();
        if word.len() <= 3 {
            continue;
        }
        if STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        if seen.insert(word.clone()) {
            out.push(word);
        }
        if out.len() >= MAX_KEYWORDS {
            break;
        }
    }
    out
}
