//! HTML content extractors (spec.md §4.1), ported from the original
//! `extractors/article.py` / `extractors/readability.py` / `extractors/raw.py`
//! fallback chain: each method is tried in order and the first producing at
//! least [`MIN_CONTENT_LEN`] characters wins.

use scraper::{Html, Selector};

pub const MIN_CONTENT_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// `<article>`/`[role=article]` structural selector.
    Structural,
    /// Rendered-HTML readability pass, only reachable when a
    /// [`crate::renderer::PageRenderer`] produced rendered markup.
    RenderedReadability,
    /// Density heuristic over generic block elements, the "article-oriented
    /// library" step of the chain.
    DensityHeuristic,
    /// Whole-`<body>` text, last resort.
    Raw,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Structural => "structural",
            ExtractionMethod::RenderedReadability => "rendered_readability",
            ExtractionMethod::DensityHeuristic => "density_heuristic",
            ExtractionMethod::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub method: ExtractionMethod,
    pub title: Option<String>,
    pub content: String,
}

fn text_of(html: &Html, selector: &Selector) -> String {
    html.select(selector)
        .flat_map(|el| el.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_of(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    html.select(&selector).next().map(|el| el.text().collect::<String>().trim().to_string())
}

/// `<article>` / `[role="article"]` elements only.
pub fn extract_structural(html: &str) -> Option<ExtractedText> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("article, [role='article']").ok()?;
    let content = text_of(&doc, &selector);
    if content.len() >= MIN_CONTENT_LEN {
        Some(ExtractedText { method: ExtractionMethod::Structural, title: title_of(&doc), content })
    } else {
        None
    }
}

/// Same structural selector run a second time over renderer-produced HTML;
/// kept as a distinct function so [`ExtractionMethod::RenderedReadability`]
/// is attributable in [`crate::stats::ExtractionStats`] even though the
/// parsing logic is shared with the structural pass.
pub fn extract_rendered_readability(rendered_html: &str) -> Option<ExtractedText> {
    extract_structural(rendered_html)
        .map(|mut extracted| {
            extracted.method = ExtractionMethod::RenderedReadability;
            extracted
        })
        .or_else(|| {
            let mut extracted = extract_density_heuristic(rendered_html)?;
            extracted.method = ExtractionMethod::RenderedReadability;
            Some(extracted)
        })
}

/// Scores every `div`/`section`/`p`-bearing block by text-to-tag density and
/// keeps the densest one — a compact stand-in for a full readability
/// library, same idea as `extractors/readability.py`'s scoring pass.
pub fn extract_density_heuristic(html: &str) -> Option<ExtractedText> {
    let doc = Html::parse_document(html);
    let block_selector = Selector::parse("div, section, main").ok()?;
    let p_selector = Selector::parse("p").ok()?;

    let mut best: Option<(usize, String)> = None;
    for block in doc.select(&block_selector) {
        let paragraph_text: String = block
            .select(&p_selector)
            .flat_map(|p| p.text())
            .collect::<Vec<_>>()
            .join(" ");
        let score = paragraph_text.len();
        if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
            best = Some((score, paragraph_text));
        }
    }

    let (score, content) = best?;
    let content = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if score >= MIN_CONTENT_LEN {
        Some(ExtractedText { method: ExtractionMethod::DensityHeuristic, title: title_of(&doc), content })
    } else {
        None
    }
}

/// Whole-`<body>` text, the unconditional last resort.
pub fn extract_raw(html: &str) -> Option<ExtractedText> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("body").ok()?;
    let content = text_of(&doc, &selector);
    if content.is_empty() {
        None
    } else {
        Some(ExtractedText { method: ExtractionMethod::Raw, title: title_of(&doc), content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_extraction_prefers_article_tag() {
        let html = format!(
            "<html><head><title>T</title></head><body><nav>skip</nav><article>{}</article></body></html>",
            "word ".repeat(30)
        );
        let extracted = extract_structural(&html).unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Structural);
        assert_eq!(extracted.title.as_deref(), Some("T"));
        assert!(!extracted.content.contains("skip"));
    }

    #[test]
    fn structural_extraction_abstains_below_min_len() {
        let html = "<html><body><article>too short</article></body></html>";
        assert!(extract_structural(html).is_none());
    }

    #[test]
    fn density_heuristic_picks_the_block_with_the_most_paragraph_text() {
        let html = format!(
            "<html><body><div><p>sidebar</p></div><div>{}</div></body></html>",
            "<p>content word</p>".repeat(20)
        );
        let extracted = extract_density_heuristic(&html).unwrap();
        assert!(extracted.content.contains("content word"));
    }

    #[test]
    fn raw_extraction_always_succeeds_on_nonempty_body() {
        let extracted = extract_raw("<html><body>hello world</body></html>").unwrap();
        assert_eq!(extracted.method, ExtractionMethod::Raw);
        assert_eq!(extracted.content, "hello world");
    }
}
