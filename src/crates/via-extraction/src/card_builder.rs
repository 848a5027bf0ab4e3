//! Card construction from extracted content (spec.md §4.1), ported from
//! `url_extractors.py`'s `_build_cards`: a parent card holding the bulk of
//! the article plus child cards split out of any `Examples`/`Patterns`
//! sections, linked back to the parent as `Related` connections (the shared
//! connection vocabulary has no example-specific variant).

use via_domain::card::{Card, CardType};
use via_domain::connection::{Connection, ConnectionType};
use via_domain::error::Result as DomainResult;
use via_domain::ids::CardId;

#[derive(Debug, Clone)]
pub struct BuiltCards {
    pub parent: Card,
    pub children: Vec<Card>,
    pub connections: Vec<Connection>,
}

const SECTION_HEADINGS: [&str; 2] = ["examples", "patterns"];

struct Section {
    heading: String,
    body: String,
}

/// Splits on lines that look like a markdown heading (`#`/`##`/...) whose
/// text matches one of [`SECTION_HEADINGS`], case-insensitively.
fn split_sections(content: &str) -> (String, Vec<Section>) {
    let mut preamble = String::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for line in content.lines() {
        let trimmed = line.trim_start_matches('#').trim();
        let is_heading = line.trim_start().starts_with('#')
            && SECTION_HEADINGS.iter().any(|h| trimmed.to_ascii_lowercase().starts_with(h));

        if is_heading {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section { heading: trimmed.to_string(), body: String::new() });
        } else if let Some(section) = current.as_mut() {
            section.body.push_str(line);
            section.body.push('\n');
        } else {
            preamble.push_str(line);
            preamble.push('\n');
        }
    }
    if let Some(section) = current.take() {
        sections.push(section);
    }
    (preamble.trim().to_string(), sections)
}

pub fn build_cards(
    canvas_id: &str,
    url: &str,
    title: &str,
    content: &str,
    next_id: impl Fn() -> String,
) -> DomainResult<BuiltCards> {
    let (preamble, sections) = split_sections(content);
    let parent_content = if preamble.is_empty() { content.to_string() } else { preamble };

    let parent_id = CardId::new(next_id());
    let parent = Card::new(parent_id.clone(), canvas_id, title, parent_content).with_source(url);

    let mut children = Vec::new();
    let mut connections = Vec::new();
    for section in sections {
        if section.body.trim().is_empty() {
            continue;
        }
        let child_id = CardId::new(next_id());
        let child = Card::new(child_id.clone(), canvas_id, &section.heading, section.body.trim())
            .with_parent(parent_id.clone())
            .with_source(url);
        let connection_id = format!("{}-{}-demonstrates", parent_id, child_id);
        let connection = Connection::new(
            connection_id,
            canvas_id,
            child_id.clone(),
            parent_id.clone(),
            ConnectionType::Related,
        )?;
        children.push(child);
        connections.push(connection);
    }

    Ok(BuiltCards { parent, children, connections })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn id_gen() -> impl Fn() -> String {
        let counter = Cell::new(0);
        move || {
            let next = counter.get();
            counter.set(next + 1);
            format!("card-{next}")
        }
    }

    #[test]
    fn splits_examples_section_into_a_child_card() {
        let content = "Intro text.\n\n## Examples\nfoo bar baz\n";
        let built = build_cards("canvas-1", "https://example.com", "Title", content, id_gen()).unwrap();
        assert_eq!(built.children.len(), 1);
        assert!(built.children[0].content.contains("foo bar baz"));
        assert_eq!(built.parent.content, "Intro text.");
        assert_eq!(built.connections.len(), 1);
    }

    #[test]
    fn content_with_no_recognized_sections_produces_no_children() {
        let content = "Just a plain article with no special sections.";
        let built = build_cards("canvas-1", "https://example.com", "Title", content, id_gen()).unwrap();
        assert!(built.children.is_empty());
        assert!(built.connections.is_empty());
        assert_eq!(built.parent.content, content);
    }

    #[test]
    fn card_type_defaults_to_rich_text() {
        let built = build_cards("canvas-1", "https://example.com", "Title", "hello", id_gen()).unwrap();
        assert_eq!(built.parent.card_type, CardType::RichText);
    }
}
