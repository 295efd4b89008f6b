//! Shared test fixtures for learnscope crates.
//!
//! Builders for questions, sessions, and historical results so engine and
//! store tests can state their scenarios in one line each.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use learnscope_model::{
    DifficultyLevel, KnowledgeArea, Question, QuizResult, QuizSession, SessionMode,
};

/// A two-option question with correct key `"a"` in the given area.
pub fn question(id: u32, area: KnowledgeArea) -> Question {
    let options: BTreeMap<String, String> = [("a", "right"), ("b", "wrong")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Question::new(
        id,
        format!("question {id}"),
        options,
        "a",
        area,
        DifficultyLevel::Beginner,
        None,
    )
    .expect("fixture question is valid")
}

/// A demo session holding the given questions.
pub fn session(user_id: &str, questions: Vec<Question>) -> QuizSession {
    QuizSession::new(user_id, questions, SessionMode::Demo)
}

/// A completed-session result with the given per-area scores, stamped `now`.
///
/// Overall score is the mean of the area scores; gap and
/// recommendation-needed lists are derived with the engine thresholds so
/// fixtures stay consistent with real results.
pub fn result(session_id: &str, user_id: &str, scores: &[(KnowledgeArea, f64)]) -> QuizResult {
    result_at(session_id, user_id, scores, Utc::now())
}

/// Like [`result`], but completed `days_ago` days in the past. Useful for
/// building ordered histories.
pub fn result_days_ago(
    session_id: &str,
    user_id: &str,
    scores: &[(KnowledgeArea, f64)],
    days_ago: i64,
) -> QuizResult {
    result_at(
        session_id,
        user_id,
        scores,
        Utc::now() - Duration::days(days_ago),
    )
}

/// Like [`result`], with an explicit completion timestamp.
pub fn result_at(
    session_id: &str,
    user_id: &str,
    scores: &[(KnowledgeArea, f64)],
    completed_at: DateTime<Utc>,
) -> QuizResult {
    let area_scores: BTreeMap<KnowledgeArea, f64> = scores.iter().copied().collect();
    let overall_score = if area_scores.is_empty() {
        0.0
    } else {
        area_scores.values().sum::<f64>() / area_scores.len() as f64
    };
    let knowledge_gaps: Vec<KnowledgeArea> = KnowledgeArea::ALL
        .iter()
        .copied()
        .filter(|area| area_scores.get(area).is_some_and(|&s| s < 0.60))
        .collect();
    let recommendations_needed: Vec<KnowledgeArea> = KnowledgeArea::ALL
        .iter()
        .copied()
        .filter(|area| area_scores.get(area).is_some_and(|&s| s < 0.70))
        .collect();
    let performance = if overall_score >= 0.80 {
        DifficultyLevel::Advanced
    } else if overall_score >= 0.60 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    };
    let total_questions = 10;
    let correct_answers = (overall_score * total_questions as f64).round() as usize;

    QuizResult {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        completed_at,
        overall_score,
        area_scores,
        knowledge_gaps,
        performance,
        recommendations_needed,
        total_questions,
        correct_answers,
    }
}
