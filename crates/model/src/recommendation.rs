//! Recommendations and the clamped confidence score attached to them.

use serde::{Deserialize, Serialize};

use crate::area::KnowledgeArea;

/// Confidence score clamped to [0.0, 1.0].
///
/// The newtype guarantees a valid range at construction, so downstream
/// arithmetic (averaging during blending) never has to re-check bounds.
///
/// ```
/// use learnscope_model::Confidence;
///
/// assert_eq!(Confidence::new(0.85).value(), 0.85);
/// assert_eq!(Confidence::new(1.7).value(), 1.0);
/// assert_eq!(Confidence::new(-0.2).value(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence, clamping the value to [0.0, 1.0].
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// The inner value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A single ranked learning recommendation for one knowledge area.
///
/// Priorities are always a dense 1..N ranking; the blender reassigns them
/// after every merge. The advice text is the one mutable field, filled in
/// last by the annotator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Target knowledge area.
    pub area: KnowledgeArea,
    /// Rank, 1 = highest. Dense across the final list.
    pub priority: usize,
    /// Curated resource names, deduplicated.
    pub resources: Vec<String>,
    /// Coarse estimated-time bucket (e.g. "1-2 weeks").
    pub estimated_time: String,
    /// Self-assessed reliability of this recommendation.
    pub confidence: Confidence,
    /// Human-readable justification, filled by the annotator.
    pub advice: String,
}
