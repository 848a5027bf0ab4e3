//! Stage A retriever (spec.md §4.4): a vector index over centroids and a
//! BM25 keyword index over profile keywords, combined as
//! `combined = alpha * semantic + (1 - alpha) * lexical` after per-list
//! min-max normalization.

use std::collections::HashMap;
use via_domain::CategoryProfile;

pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_BM25_K1: f64 = 1.5;
pub const DEFAULT_BM25_B: f64 = 0.75;
const RETRIEVE_TOP_N: usize = 20;

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

fn min_max_normalize(scores: &mut [(String, f64)]) {
    if scores.is_empty() {
        return;
    }
    let min = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    for (_, score) in scores.iter_mut() {
        *score = if range > 0.0 { (*score - min) / range } else { 1.0 };
    }
}

/// Top-20 profiles by cosine similarity between `embedding` and each
/// profile's centroid.
pub fn vector_retrieve(profiles: &[CategoryProfile], embedding: &[f32]) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = profiles
        .iter()
        .map(|p| (p.id.to_string(), cosine_similarity(embedding, &p.centroid)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(RETRIEVE_TOP_N);
    scored
}

/// Top-20 profiles by BM25 over each profile's keyword list, treating
/// keyword scores as term frequencies within that "document".
pub fn keyword_retrieve(
    profiles: &[CategoryProfile],
    query_terms: &[String],
    k1: f64,
    b: f64,
) -> Vec<(String, f64)> {
    if profiles.is_empty() || query_terms.is_empty() {
        return Vec::new();
    }
    let docs: Vec<HashMap<&str, f64>> = profiles
        .iter()
        .map(|p| {
            p.keywords
                .iter()
                .map(|kw| (kw.term.as_str(), kw.score.max(1.0)))
                .collect()
        })
        .collect();
    let doc_lens: Vec<f64> = docs.iter().map(|d| d.values().sum()).collect();
    let avg_len = if doc_lens.is_empty() {
        0.0
    } else {
        doc_lens.iter().sum::<f64>() / doc_lens.len() as f64
    };
    let n = profiles.len() as f64;

    let mut idf: HashMap<&str, f64> = HashMap::new();
    for term in query_terms {
        let df = docs.iter().filter(|d| d.contains_key(term.as_str())).count() as f64;
        let value = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
        idf.insert(term.as_str(), value);
    }

    let mut scored: Vec<(String, f64)> = profiles
        .iter()
        .zip(docs.iter())
        .zip(doc_lens.iter())
        .map(|((profile, doc), &dl)| {
            let mut score = 0.0;
            for term in query_terms {
                let Some(&freq) = doc.get(term.as_str()) else {
                    continue;
                };
                let term_idf = idf.get(term.as_str()).copied().unwrap_or(0.0);
                let denom = freq + k1 * (1.0 - b + b * (dl / avg_len.max(1e-9)));
                score += term_idf * (freq * (k1 + 1.0)) / denom.max(1e-9);
            }
            (profile.id.to_string(), score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(RETRIEVE_TOP_N);
    scored
}

pub struct RetrieverConfig {
    pub alpha: f64,
    pub k1: f64,
    pub b: f64,
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            k1: DEFAULT_BM25_K1,
            b: DEFAULT_BM25_B,
            top_k: 10,
        }
    }
}

/// Combines the two stage-A lists: per-list min-max normalize, then
/// `combined = alpha * semantic + (1 - alpha) * lexical`, returning the
/// top-k candidate profile ids for Stage B.
pub fn combine(
    profiles: &[CategoryProfile],
    embedding: &[f32],
    query_terms: &[String],
    config: &RetrieverConfig,
) -> Vec<(String, f64)> {
    let mut semantic = vector_retrieve(profiles, embedding);
    let mut lexical = keyword_retrieve(profiles, query_terms, config.k1, config.b);
    min_max_normalize(&mut semantic);
    min_max_normalize(&mut lexical);

    let semantic_map: HashMap<String, f64> = semantic.into_iter().collect();
    let lexical_map: HashMap<String, f64> = lexical.into_iter().collect();
    let mut ids: std::collections::HashSet<String> = semantic_map.keys().cloned().collect();
    ids.extend(lexical_map.keys().cloned());

    let mut combined: Vec<(String, f64)> = ids
        .into_iter()
        .map(|id| {
            let s = semantic_map.get(&id).copied().unwrap_or(0.0);
            let l = lexical_map.get(&id).copied().unwrap_or(0.0);
            (id, config.alpha * s + (1.0 - config.alpha) * l)
        })
        .collect();
    combined.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    combined.truncate(config.top_k);
    combined
}
