//! Blend collaborative and content candidates into the final ranked list.

use std::collections::BTreeMap;

use learnscope_model::{Confidence, KnowledgeArea, QuizResult, Recommendation};
use tracing::debug;

use crate::content::{estimated_time, resources_for};
use crate::EngineConfig;

/// Collaborative candidates from the similar-learner improvement signal.
///
/// Emits one candidate for each area that both carries an improvement
/// signal and sits in the result's recommendation-needed set, with the
/// signal as confidence, the generic per-area resource and time lookups,
/// and a placeholder advice line the annotator replaces.
pub fn collaborative_candidates(
    result: &QuizResult,
    signal: &BTreeMap<KnowledgeArea, f64>,
) -> Vec<Recommendation> {
    let mut candidates = Vec::new();
    for (&area, &confidence) in signal {
        if !result.recommendations_needed.contains(&area) {
            continue;
        }
        let score = result.area_scores.get(&area).copied().unwrap_or(0.0);
        candidates.push(Recommendation {
            area,
            priority: candidates.len() + 1,
            resources: resources_for(area).iter().map(|s| s.to_string()).collect(),
            estimated_time: estimated_time(score).to_string(),
            confidence: Confidence::new(confidence),
            advice: "Based on similar learners' success patterns".to_string(),
        });
    }
    candidates
}

/// Merge, rank, and cap the candidate sets.
///
/// Candidates for the same area collapse into one entry whose confidence
/// is the arithmetic mean of both sources and whose resource list is the
/// deduplicated union. The merged list sorts by (priority ascending,
/// confidence descending), then priorities are rewritten as the dense rank
/// 1..N and the list truncates to `config.max_recommendations`. Zero
/// candidates is a valid, empty result.
pub fn blend(
    collaborative: Vec<Recommendation>,
    content: Vec<Recommendation>,
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let mut merged: Vec<Recommendation> = Vec::new();
    for candidate in collaborative.into_iter().chain(content) {
        match merged.iter_mut().find(|rec| rec.area == candidate.area) {
            Some(existing) => {
                existing.confidence = Confidence::new(
                    (existing.confidence.value() + candidate.confidence.value()) / 2.0,
                );
                existing.resources.extend(candidate.resources);
                existing.resources.sort();
                existing.resources.dedup();
            }
            None => merged.push(candidate),
        }
    }

    merged.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then(
            b.confidence
                .value()
                .partial_cmp(&a.confidence.value())
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    for (index, rec) in merged.iter_mut().enumerate() {
        rec.priority = index + 1;
    }
    merged.truncate(config.max_recommendations);
    debug!(count = merged.len(), "blended recommendations");
    merged
}
