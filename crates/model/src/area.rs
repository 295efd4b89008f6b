//! The assessed-domain taxonomy and the difficulty ladder.

use serde::{Deserialize, Serialize};

/// One topic tag in the fixed assessed-domain taxonomy.
///
/// The declaration order is the canonical area order: feature vectors are
/// indexed by it and score ties are broken by it. Adding a variant extends
/// the universe over which every score map is defined, so the set is kept
/// closed and small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeArea {
    MlBasics,
    DeepLearning,
    Pytorch,
    Transformers,
    Gans,
    GenerativeAi,
}

impl KnowledgeArea {
    /// All areas in canonical order.
    pub const ALL: [KnowledgeArea; 6] = [
        KnowledgeArea::MlBasics,
        KnowledgeArea::DeepLearning,
        KnowledgeArea::Pytorch,
        KnowledgeArea::Transformers,
        KnowledgeArea::Gans,
        KnowledgeArea::GenerativeAi,
    ];

    /// Human-readable display label.
    pub fn label(&self) -> &'static str {
        match self {
            KnowledgeArea::MlBasics => "ML basics",
            KnowledgeArea::DeepLearning => "deep learning",
            KnowledgeArea::Pytorch => "PyTorch",
            KnowledgeArea::Transformers => "transformers",
            KnowledgeArea::Gans => "GANs",
            KnowledgeArea::GenerativeAi => "generative AI",
        }
    }
}

impl std::fmt::Display for KnowledgeArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered difficulty tier: beginner < intermediate < advanced.
///
/// Also used as the coarse performance classification of a completed
/// session, and as the suggested tier for the next attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Stable lowercase label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
