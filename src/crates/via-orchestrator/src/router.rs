//! Deterministic routing rules evaluated before the LLM is ever called
//! (spec.md §4.10, rule 1): if the incoming message contains a URL and a
//! canvas is attached to the turn, bypass specialist selection entirely and
//! go straight to extraction. Same regex family `via_extraction::url_type`
//! uses to classify an already-known URL; here the job is just "does a URL
//! appear at all", so a single general pattern is enough.

use regex::Regex;
use std::sync::OnceLock;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bhttps?://[^\s<>\x22]+").unwrap())
}

/// Returns the first URL found in `message`, if any.
pub fn first_url(message: &str) -> Option<&str> {
    url_re().find(message).map(|m| m.as_str())
}

/// Spec.md §4.10 rule 1: bypass the LLM only when both a URL and a
/// `canvas_id` are present on the turn.
pub fn url_shortcut<'a>(message: &'a str, canvas_id: Option<&str>) -> Option<&'a str> {
    canvas_id?;
    first_url(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_url_embedded_in_prose() {
        let msg = "check out https://example.com/article for details";
        assert_eq!(first_url(msg), Some("https://example.com/article"));
    }

    #[test]
    fn no_shortcut_without_a_canvas_id() {
        let msg = "check out https://example.com/article";
        assert!(url_shortcut(msg, None).is_none());
    }

    #[test]
    fn no_shortcut_without_a_url() {
        assert!(url_shortcut("what should I learn next", Some("canvas-1")).is_none());
    }

    #[test]
    fn shortcut_fires_when_both_conditions_hold() {
        let msg = "summarize https://example.com";
        assert_eq!(url_shortcut(msg, Some("canvas-1")), Some("https://example.com"));
    }
}
