//! Stage B LLM classifier (spec.md §4.4). Structured output is parsed with
//! a forgiving extractor that tolerates surrounding prose and fenced code
//! (spec.md §9, "LLM JSON contract"); validation failure triggers the
//! deterministic fallback rather than an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use via_graph_core::llm::{ChatModel, ChatRequest};
use via_graph_core::Message;

pub const FALLBACK_MATCH_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationAction {
    Match,
    CreateNew,
    Uncategorized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategorySpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClassification {
    pub action: ClassificationAction,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub new_category: Option<NewCategorySpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationDecision {
    Match { category_id: String, confidence: f64 },
    CreateNew { spec: NewCategorySpec, confidence: f64 },
    Uncategorized,
}

/// Extracts the first balanced `{...}` JSON object from `text`, tolerating
/// surrounding prose or a fenced code block.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for (offset, &byte) in bytes[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate(raw: RawClassification) -> Option<RawClassification> {
    match raw.action {
        ClassificationAction::Match if raw.category_id.is_some() => Some(raw),
        // spec.md §4.4: `create_new` requires `{name, description, keywords}`;
        // an empty `keywords` (the field defaults via serde) is treated the
        // same as a missing `new_category` and falls through to the fallback.
        ClassificationAction::CreateNew
            if raw
                .new_category
                .as_ref()
                .is_some_and(|spec| !spec.keywords.is_empty()) =>
        {
            Some(raw)
        }
        ClassificationAction::Uncategorized => Some(raw),
        _ => None,
    }
}

fn parse_llm_output(text: &str) -> Option<RawClassification> {
    let json_str = extract_json_object(text)?;
    let raw: RawClassification = serde_json::from_str(json_str).ok()?;
    validate(raw)
}

/// Falls back to matching the highest Stage-A candidate iff its score is
/// >= 0.6, else uncategorized.
fn fallback(candidates: &[(String, f64)]) -> ClassificationDecision {
    match candidates.first() {
        Some((id, score)) if *score >= FALLBACK_MATCH_THRESHOLD => ClassificationDecision::Match {
            category_id: id.clone(),
            confidence: *score,
        },
        _ => ClassificationDecision::Uncategorized,
    }
}

fn build_prompt(content: &str, candidates: &[(String, f64)]) -> String {
    let candidate_lines: String = candidates
        .iter()
        .map(|(id, score)| format!("- {id} (stage-A score {score:.3})"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Classify the following card content into one of the candidate categories, \
         create a new category, or mark it uncategorized.\n\nContent:\n{content}\n\n\
         Candidates:\n{candidate_lines}\n\n\
         Respond with JSON only: {{\"action\": \"match\"|\"create_new\"|\"uncategorized\", \
         \"confidence\": 0.0-1.0, \"category_id\": \"...\" (required for match), \
         \"new_category\": {{\"name\": \"...\", \"description\": \"...\", \"keywords\": [...]}} \
         (required for create_new)}}"
    )
}

pub async fn classify(
    model: &Arc<dyn ChatModel>,
    content: &str,
    candidates: &[(String, f64)],
) -> ClassificationDecision {
    if candidates.is_empty() {
        return ClassificationDecision::Uncategorized;
    }
    let prompt = build_prompt(content, candidates);
    let request = ChatRequest::new(vec![
        Message::system("You are a precise JSON-only category classifier."),
        Message::human(prompt),
    ]);

    let response = match model.chat(request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "classifier LLM call failed, using fallback");
            return fallback(candidates);
        }
    };

    let Some(text) = response.message.text() else {
        return fallback(candidates);
    };

    match parse_llm_output(text) {
        Some(raw) => match raw.action {
            ClassificationAction::Match => ClassificationDecision::Match {
                category_id: raw.category_id.expect("validated"),
                confidence: raw.confidence.unwrap_or(0.8),
            },
            ClassificationAction::CreateNew => ClassificationDecision::CreateNew {
                spec: raw.new_category.expect("validated"),
                confidence: raw.confidence.unwrap_or(0.5),
            },
            ClassificationAction::Uncategorized => ClassificationDecision::Uncategorized,
        },
        None => {
            tracing::warn!("classifier LLM output failed validation, using fallback");
            fallback(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let text = "Sure thing! Here you go:\n```json\n{\"action\": \"uncategorized\"}\n```\nHope that helps.";
        let raw = parse_llm_output(text).unwrap();
        assert_eq!(raw.action, ClassificationAction::Uncategorized);
    }

    #[test]
    fn match_without_category_id_fails_validation() {
        let text = r#"{"action": "match", "confidence": 0.9}"#;
        assert!(parse_llm_output(text).is_none());
    }

    #[test]
    fn create_new_without_spec_fails_validation() {
        let text = r#"{"action": "create_new"}"#;
        assert!(parse_llm_output(text).is_none());
    }

    #[test]
    fn create_new_with_empty_keywords_fails_validation() {
        let text = r#"{"action": "create_new", "new_category": {"name": "Foo", "description": "bar", "keywords": []}}"#;
        assert!(parse_llm_output(text).is_none());
    }

    #[test]
    fn create_new_with_keywords_passes_validation() {
        let text =
            r#"{"action": "create_new", "new_category": {"name": "Foo", "description": "bar", "keywords": ["foo"]}}"#;
        assert!(parse_llm_output(text).is_some());
    }

    #[test]
    fn fallback_matches_top_candidate_above_threshold() {
        let decision = fallback(&[("p1".to_string(), 0.7)]);
        assert_eq!(
            decision,
            ClassificationDecision::Match {
                category_id: "p1".to_string(),
                confidence: 0.7
            }
        );
    }

    #[test]
    fn fallback_is_uncategorized_below_threshold() {
        let decision = fallback(&[("p1".to_string(), 0.4)]);
        assert_eq!(decision, ClassificationDecision::Uncategorized);
    }

    #[test]
    fn fallback_with_no_candidates_is_uncategorized() {
        assert_eq!(fallback(&[]), ClassificationDecision::Uncategorized);
    }
}
