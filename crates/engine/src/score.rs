//! Session scoring and knowledge-gap ranking.

use std::collections::BTreeMap;

use chrono::Utc;
use learnscope_model::{DifficultyLevel, KnowledgeArea, QuizResult, QuizSession};

/// An area scoring below this is a knowledge gap.
pub const GAP_THRESHOLD: f64 = 0.60;
/// An area scoring below this needs a recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.70;

/// Score a completed session into a [`QuizResult`].
///
/// Per-area score is correct/attempted within that area; areas the session
/// never attempted are omitted from the score map, not zeroed. The
/// performance tier comes from the overall score alone. An empty session
/// yields a zero/empty result rather than dividing by zero.
pub fn calculate_score(session: &QuizSession) -> QuizResult {
    let completed_at = session.completed_at.unwrap_or_else(Utc::now);
    let total_questions = session.questions.len();
    if total_questions == 0 {
        return empty_result(session, completed_at);
    }

    let mut correct_answers = 0usize;
    let mut per_area: BTreeMap<KnowledgeArea, (usize, usize)> = BTreeMap::new();
    for question in &session.questions {
        let tally = per_area.entry(question.knowledge_area).or_insert((0, 0));
        tally.1 += 1;
        if let Some(answer) = session.answers.get(&question.id) {
            if question.is_correct(answer) {
                tally.0 += 1;
                correct_answers += 1;
            }
        }
    }

    let overall_score = correct_answers as f64 / total_questions as f64;
    let area_scores: BTreeMap<KnowledgeArea, f64> = per_area
        .into_iter()
        .map(|(area, (correct, attempted))| (area, correct as f64 / attempted as f64))
        .collect();

    let knowledge_gaps: Vec<KnowledgeArea> = area_scores
        .iter()
        .filter(|(_, &score)| score < GAP_THRESHOLD)
        .map(|(&area, _)| area)
        .collect();
    let recommendations_needed: Vec<KnowledgeArea> = area_scores
        .iter()
        .filter(|(_, &score)| score < RECOMMENDATION_THRESHOLD)
        .map(|(&area, _)| area)
        .collect();

    let result = QuizResult {
        session_id: session.session_id.clone(),
        user_id: session.user_id.clone(),
        completed_at,
        overall_score,
        area_scores,
        knowledge_gaps,
        performance: performance_tier(overall_score),
        recommendations_needed,
        total_questions,
        correct_answers,
    };
    tracing::info!(
        session = %result.session_id,
        score = format!("{:.2}", result.overall_score),
        "scored session"
    );
    result
}

/// Rank a result's gap areas worst first.
///
/// Filters the area scores below the gap threshold and sorts ascending by
/// score; the sort is stable, so ties keep the canonical area order the
/// score map iterates in.
pub fn rank_gaps(result: &QuizResult) -> Vec<KnowledgeArea> {
    let mut gaps: Vec<(KnowledgeArea, f64)> = result
        .area_scores
        .iter()
        .filter(|(_, &score)| score < GAP_THRESHOLD)
        .map(|(&area, &score)| (area, score))
        .collect();
    gaps.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    gaps.into_iter().map(|(area, _)| area).collect()
}

/// Tier from the overall score only, never per-area.
fn performance_tier(overall_score: f64) -> DifficultyLevel {
    if overall_score >= 0.80 {
        DifficultyLevel::Advanced
    } else if overall_score >= 0.60 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    }
}

fn empty_result(session: &QuizSession, completed_at: chrono::DateTime<Utc>) -> QuizResult {
    QuizResult {
        session_id: session.session_id.clone(),
        user_id: session.user_id.clone(),
        completed_at,
        overall_score: 0.0,
        area_scores: BTreeMap::new(),
        knowledge_gaps: Vec::new(),
        performance: DifficultyLevel::Beginner,
        recommendations_needed: Vec::new(),
        total_questions: 0,
        correct_answers: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnscope_test_utils::{question, result, session};

    #[test]
    fn test_empty_session_yields_zero_result() {
        let mut s = session("u1", Vec::new());
        s.complete().unwrap();
        let r = calculate_score(&s);
        assert_eq!(r.overall_score, 0.0);
        assert!(r.area_scores.is_empty());
        assert!(r.knowledge_gaps.is_empty());
        assert_eq!(r.performance, DifficultyLevel::Beginner);
        assert_eq!(r.total_questions, 0);
    }

    #[test]
    fn test_overall_score_identity() {
        // 3 questions, 2 correct: correct key is always "a".
        let mut s = session(
            "u1",
            vec![
                question(1, KnowledgeArea::MlBasics),
                question(2, KnowledgeArea::MlBasics),
                question(3, KnowledgeArea::Gans),
            ],
        );
        s.record_answer(1, "a").unwrap();
        s.record_answer(2, "b").unwrap();
        s.record_answer(3, "A").unwrap(); // case-insensitive
        s.complete().unwrap();

        let r = calculate_score(&s);
        assert_eq!(r.correct_answers, 2);
        assert_eq!(r.total_questions, 3);
        assert!((r.overall_score - 2.0 / 3.0).abs() < 1e-9);
        for score in r.area_scores.values() {
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_unanswered_counts_as_wrong_and_unattempted_area_is_absent() {
        let mut s = session(
            "u1",
            vec![
                question(1, KnowledgeArea::Pytorch),
                question(2, KnowledgeArea::Pytorch),
            ],
        );
        s.record_answer(1, "a").unwrap();
        s.complete().unwrap();

        let r = calculate_score(&s);
        assert_eq!(r.area_scores.get(&KnowledgeArea::Pytorch), Some(&0.5));
        assert!(!r.area_scores.contains_key(&KnowledgeArea::Gans));
    }

    #[test]
    fn test_gap_subset_of_recommendations_needed() {
        let mut s = session(
            "u1",
            vec![
                question(1, KnowledgeArea::MlBasics),
                question(2, KnowledgeArea::MlBasics),
                question(3, KnowledgeArea::Gans),
                question(4, KnowledgeArea::Gans),
                question(5, KnowledgeArea::Gans),
            ],
        );
        // MlBasics 2/2 = 1.0; Gans 1/3 ~ 0.33 -> gap and recommendation.
        for (id, answer) in [(1, "a"), (2, "a"), (3, "a"), (4, "b"), (5, "b")] {
            s.record_answer(id, answer).unwrap();
        }
        s.complete().unwrap();

        let r = calculate_score(&s);
        assert_eq!(r.knowledge_gaps, vec![KnowledgeArea::Gans]);
        assert_eq!(r.recommendations_needed, vec![KnowledgeArea::Gans]);
        for gap in &r.knowledge_gaps {
            assert!(r.recommendations_needed.contains(gap));
        }
    }

    #[test]
    fn test_performance_tier_boundaries() {
        assert_eq!(performance_tier(0.80), DifficultyLevel::Advanced);
        assert_eq!(performance_tier(0.79), DifficultyLevel::Intermediate);
        assert_eq!(performance_tier(0.60), DifficultyLevel::Intermediate);
        assert_eq!(performance_tier(0.59), DifficultyLevel::Beginner);
    }

    #[test]
    fn test_rank_gaps_worst_first() {
        let r = result(
            "s1",
            "u1",
            &[
                (KnowledgeArea::MlBasics, 0.5),
                (KnowledgeArea::Transformers, 0.2),
                (KnowledgeArea::Gans, 0.9),
            ],
        );
        assert_eq!(
            rank_gaps(&r),
            vec![KnowledgeArea::Transformers, KnowledgeArea::MlBasics]
        );
    }

    #[test]
    fn test_rank_gaps_stable_under_ties() {
        let r = result(
            "s1",
            "u1",
            &[
                (KnowledgeArea::Gans, 0.4),
                (KnowledgeArea::MlBasics, 0.4),
                (KnowledgeArea::Pytorch, 0.4),
            ],
        );
        // Ties keep canonical declaration order.
        assert_eq!(
            rank_gaps(&r),
            vec![
                KnowledgeArea::MlBasics,
                KnowledgeArea::Pytorch,
                KnowledgeArea::Gans
            ]
        );
    }

    #[test]
    fn test_rank_gaps_empty_is_empty() {
        let r = result("s1", "u1", &[(KnowledgeArea::MlBasics, 0.95)]);
        assert!(rank_gaps(&r).is_empty());
    }
}
