//! Card entity (spec.md §3).

use crate::ids::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    RichText,
    Link,
    Video,
    Todo,
    Reminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Url,
    AiGenerated,
    Manual,
}

/// Type-specific payload (video URL, todo items, ...). Kept as an opaque JSON
/// value since its shape varies per `CardType` and is owned by the canvas
/// CRUD service, not interpreted here beyond pass-through.
pub type CardData = Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub canvas_id: String,
    pub title: String,
    pub content: String,
    pub card_type: CardType,
    pub parent_id: Option<CardId>,
    pub tags: BTreeSet<String>,
    pub card_data: Option<CardData>,
    pub source_url: Option<String>,
    pub source_type: SourceType,
    pub sources: Vec<String>,
    pub conflict: bool,
}

impl Card {
    pub fn new(id: impl Into<CardId>, canvas_id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            canvas_id: canvas_id.into(),
            title: title.into(),
            content: content.into(),
            card_type: CardType::RichText,
            parent_id: None,
            tags: BTreeSet::new(),
            card_data: None,
            source_url: None,
            source_type: SourceType::Manual,
            sources: Vec::new(),
            conflict: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<CardId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self.source_type = SourceType::Url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_card_defaults_to_manual_source_and_no_parent() {
        let card = Card::new("c1", "canvas-1", "Title", "Content");
        assert_eq!(card.source_type, SourceType::Manual);
        assert!(card.parent_id.is_none());
        assert!(card.tags.is_empty());
    }

    #[test]
    fn with_source_sets_url_source_type() {
        let card = Card::new("c1", "canvas-1", "Title", "Content").with_source("https://example.com");
        assert_eq!(card.source_type, SourceType::Url);
        assert_eq!(card.source_url.as_deref(), Some("https://example.com"));
    }
}
