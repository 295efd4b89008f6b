//! Derived results of a completed session. Immutable once computed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::area::{DifficultyLevel, KnowledgeArea};

/// The scored outcome of one completed quiz session.
///
/// Area scores only contain areas the session actually attempted; an area
/// absent from the map is unknown, not zero. Many results may exist per
/// learner over time and together form that learner's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    /// Owning session.
    pub session_id: String,
    /// Owning learner.
    pub user_id: String,
    /// When the owning session completed. History ordering keys off this,
    /// never off the session identifier.
    pub completed_at: DateTime<Utc>,
    /// Fraction of all questions answered correctly, in [0, 1].
    pub overall_score: f64,
    /// Fraction correct within each attempted area.
    pub area_scores: BTreeMap<KnowledgeArea, f64>,
    /// Areas scoring below the gap threshold (0.60), in canonical area order.
    pub knowledge_gaps: Vec<KnowledgeArea>,
    /// Coarse classification from the overall score alone.
    pub performance: DifficultyLevel,
    /// Areas scoring below the recommendation threshold (0.70).
    pub recommendations_needed: Vec<KnowledgeArea>,
    /// Number of questions in the session.
    pub total_questions: usize,
    /// Number answered correctly.
    pub correct_answers: usize,
}

impl QuizResult {
    /// Overall score as a percentage for display.
    pub fn percentage(&self) -> f64 {
        self.overall_score * 100.0
    }

    /// Areas where the learner is strong (score strictly above 0.70).
    pub fn strong_areas(&self) -> impl Iterator<Item = (KnowledgeArea, f64)> + '_ {
        self.area_scores
            .iter()
            .filter(|(_, &score)| score > 0.70)
            .map(|(&area, &score)| (area, score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_and_strengths() {
        let mut area_scores = BTreeMap::new();
        area_scores.insert(KnowledgeArea::MlBasics, 1.0);
        area_scores.insert(KnowledgeArea::Gans, 0.5);
        let result = QuizResult {
            session_id: "s1".into(),
            user_id: "u1".into(),
            completed_at: Utc::now(),
            overall_score: 0.75,
            area_scores,
            knowledge_gaps: vec![KnowledgeArea::Gans],
            performance: DifficultyLevel::Intermediate,
            recommendations_needed: vec![KnowledgeArea::Gans],
            total_questions: 8,
            correct_answers: 6,
        };
        assert_eq!(result.percentage(), 75.0);
        let strong: Vec<_> = result.strong_areas().map(|(a, _)| a).collect();
        assert_eq!(strong, vec![KnowledgeArea::MlBasics]);
    }
}
