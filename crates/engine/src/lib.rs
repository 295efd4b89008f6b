//! Assessment scoring and hybrid recommendation engine.
//!
//! This crate provides:
//! - Session scoring into per-area and overall results ([`score`])
//! - Knowledge-gap ranking ([`score::rank_gaps`])
//! - Similar-learner search over historical results ([`similarity`])
//! - Improvement mining from similar learners' histories ([`history`])
//! - Content-based candidates from the topic-adjacency table ([`content`])
//! - Candidate blending into a ranked, capped list ([`blend`])
//! - Advice annotation with a silent rule-based fallback ([`annotate`])
//! - Adaptive difficulty suggestions ([`difficulty`])
//!
//! Every entry point is a pure function over its inputs; the historical
//! corpus is read-only here and nothing in this crate panics on degenerate
//! input. The worst case is an empty or fallback-annotated recommendation
//! list.

pub mod annotate;
pub mod blend;
pub mod content;
pub mod difficulty;
pub mod history;
pub mod score;
pub mod similarity;

pub use annotate::annotate;
pub use blend::{blend, collaborative_candidates};
pub use content::{area_similarity, content_candidates, estimated_time, resources_for};
pub use difficulty::suggest_difficulty;
pub use history::improvement_signal;
pub use score::{calculate_score, rank_gaps, GAP_THRESHOLD, RECOMMENDATION_THRESHOLD};
pub use similarity::{find_similar_learners, SimilarLearner};

use learnscope_advice::AdvicePrompter;
use learnscope_model::{QuizResult, Recommendation};
use serde::{Deserialize, Serialize};

/// Tunable engine parameters.
///
/// The defaults are the untuned production constants; they are fields
/// rather than hard-coded so deployments can adjust them without touching
/// the algorithms. The gap (0.60) and
/// recommendation (0.70) thresholds are definitional and stay constants in
/// [`score`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum cosine similarity for a historical learner to count as
    /// similar. Strict: a score exactly at the threshold does not qualify.
    pub similarity_threshold: f64,
    /// Minimum per-area score delta counted as a significant improvement.
    pub improvement_delta: f64,
    /// Maximum number of similar learners considered.
    pub max_similar: usize,
    /// Cap on the final recommendation list.
    pub max_recommendations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            improvement_delta: 0.10,
            max_similar: 3,
            max_recommendations: 5,
        }
    }
}

/// Run the full recommendation pipeline for one scored result.
///
/// Combines collaborative candidates (similar learners' improvement
/// patterns) with content-based candidates (topic adjacency to the
/// learner's strengths), blends them into a ranked capped list, and
/// annotates every entry with advice text. `prompter` is the optional
/// text-generation collaborator; with `None`, or on any collaborator
/// failure, the deterministic fallback supplies the advice. This function
/// never fails.
pub fn recommend(
    result: &QuizResult,
    history: &[QuizResult],
    prompter: Option<&dyn AdvicePrompter>,
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let similar = similarity::find_similar_learners(result, history, config);
    let signal = history::improvement_signal(&similar, history, config);
    let collaborative = blend::collaborative_candidates(result, &signal);
    let content = content::content_candidates(result);
    let mut recommendations = blend::blend(collaborative, content, config);
    annotate::annotate(&mut recommendations, result, prompter);
    tracing::info!(
        session = %result.session_id,
        count = recommendations.len(),
        "generated recommendations"
    );
    recommendations
}
