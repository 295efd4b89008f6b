//! Attach advice text to blended recommendations.

use learnscope_advice::{fallback_advice, AdvicePrompter};
use learnscope_model::{QuizResult, Recommendation};
use tracing::warn;

/// Fill every recommendation's advice text.
///
/// Asks the text-generation collaborator with the area and the learner's
/// score in that area; on any failure, empty response, or with no prompter
/// configured at all, silently substitutes the deterministic rule-based
/// advice. Annotation never fails and never leaves advice empty.
pub fn annotate(
    recommendations: &mut [Recommendation],
    result: &QuizResult,
    prompter: Option<&dyn AdvicePrompter>,
) {
    for rec in recommendations.iter_mut() {
        let score = result.area_scores.get(&rec.area).copied().unwrap_or(0.0);
        rec.advice = match prompter {
            Some(prompter) => match prompter.advice_for(rec.area, score) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => fallback_advice(rec.area, score),
                Err(e) => {
                    warn!(area = %rec.area, error = %e, "advice prompter failed, using fallback");
                    fallback_advice(rec.area, score)
                }
            },
            None => fallback_advice(rec.area, score),
        };
    }
}
