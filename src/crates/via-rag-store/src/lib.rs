//! Retrieval-augmented context store (spec.md §4.7/§6): chunks card
//! content, embeds and upserts it into a [`backend::VectorBackend`], tracks
//! what has been indexed to skip unchanged content, and formats retrieved
//! chunks into an LLM-ready context string. Ported from `rag_service.py` /
//! `index_tracker.py`.

pub mod backend;
pub mod chunking;
mod error;
mod service;
pub mod tracker;

pub use backend::{InMemoryVectorBackend, SearchHit, VectorBackend};
pub use chunking::chunk_text;
pub use error::{RagStoreError, Result};
pub use service::{IndexOutcome, RagStore};
pub use tracker::{content_hash, IndexTracker, TrackerStats};
