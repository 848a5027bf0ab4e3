//! URL content extraction (spec.md §4.1): type detection, a TTL cache over
//! [`via_domain::rag::ExtractionCacheEntry`], per-host rate gating, a
//! fallback chain of HTML extraction strategies, and card construction from
//! the result. Ported from `url_extractors.py`.

pub mod cache;
pub mod card_builder;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod renderer;
pub mod service;
pub mod stats;
pub mod url_type;

pub use cache::ExtractionCache;
pub use card_builder::{build_cards, BuiltCards};
pub use error::{ExtractionError, Result};
pub use extractors::{ExtractedText, ExtractionMethod};
pub use fetch::Fetcher;
pub use renderer::{NullRenderer, PageRenderer};
pub use service::ExtractionService;
pub use stats::{ExtractionStats, ExtractionStatsSnapshot};
pub use url_type::{detect_url_type, host_of, UrlType};
