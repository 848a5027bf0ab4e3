//! Knowledge-graph self-correction (spec.md §4.9): a periodic job that
//! detects drift (orphaned cards, weak connections, uncategorized cards,
//! likely duplicates), auto-applies the fixes that are safe unattended, and
//! surfaces the rest as proposals. Ported from `self_correction_job.py`.

mod error;
mod job;
mod lookup;

pub use error::{Result, SelfCorrectionError};
pub use job::{CorrectionCaps, CorrectionPassSummary, SelfCorrectionJob};
pub use lookup::{CategoryLookup, NoCategorySystem};
