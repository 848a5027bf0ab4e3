//! Similarity thresholds (spec.md §6 configuration table).

#[derive(Debug, Clone, Copy)]
pub struct KgThresholds {
    pub min_parent: f64,
    pub prefer_parent: f64,
    pub strong_conn: f64,
    pub duplicate: f64,
    pub conflict: f64,
    pub weak_edge: f64,
}

impl Default for KgThresholds {
    fn default() -> Self {
        Self {
            min_parent: 0.3,
            prefer_parent: 0.5,
            strong_conn: 0.7,
            duplicate: 0.9,
            conflict: 0.6,
            weak_edge: 0.2,
        }
    }
}
