//! Mine improvement patterns from similar learners' histories.

use std::collections::BTreeMap;

use learnscope_model::{KnowledgeArea, QuizResult};
use tracing::debug;

use crate::similarity::SimilarLearner;
use crate::EngineConfig;

/// Aggregate per-area improvement signal from the similar learners.
///
/// For each similar session, the owning learner's results are ordered
/// strictly by completion timestamp (identifier-based ordering is
/// undefined here) and every consecutive-pair delta above
/// `config.improvement_delta` accumulates into that area's total. Totals
/// are then divided by the number of similar sessions considered, not by
/// the number of qualifying deltas, which deliberately dampens the signal
/// when few similar learners improved. Areas with no accumulated
/// improvement are absent from the output.
pub fn improvement_signal(
    similar: &[SimilarLearner],
    history: &[QuizResult],
    config: &EngineConfig,
) -> BTreeMap<KnowledgeArea, f64> {
    if similar.is_empty() {
        return BTreeMap::new();
    }

    let mut totals: BTreeMap<KnowledgeArea, f64> = BTreeMap::new();
    for learner in similar {
        let Some(owner) = history
            .iter()
            .find(|r| r.session_id == learner.session_id)
            .map(|r| r.user_id.as_str())
        else {
            continue;
        };

        let mut trajectory: Vec<&QuizResult> =
            history.iter().filter(|r| r.user_id == owner).collect();
        trajectory.sort_by_key(|r| r.completed_at);
        if trajectory.len() < 2 {
            continue;
        }

        for pair in trajectory.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            for area in KnowledgeArea::ALL {
                let before = previous.area_scores.get(&area).copied().unwrap_or(0.0);
                let after = current.area_scores.get(&area).copied().unwrap_or(0.0);
                let delta = after - before;
                if delta > config.improvement_delta {
                    *totals.entry(area).or_insert(0.0) += delta;
                }
            }
        }
    }

    let denominator = similar.len() as f64;
    for value in totals.values_mut() {
        *value /= denominator;
    }
    debug!(
        similar = similar.len(),
        areas = totals.len(),
        "improvement signal"
    );
    totals
}
