//! Adaptive difficulty suggestion from recent performance.

use learnscope_model::{DifficultyLevel, QuizResult};

/// Suggest the next difficulty tier from a learner's history.
///
/// `history` is ordered most-recent-first (the store contract). The
/// suggestion looks at the most recent 3 results: mean overall score plus
/// consistency, defined as 1 minus the population standard deviation of
/// those scores. Consistency can go negative for erratic histories; that
/// is accepted, not clamped. Empty history starts at beginner.
pub fn suggest_difficulty(history: &[QuizResult]) -> DifficultyLevel {
    if history.is_empty() {
        return DifficultyLevel::Beginner;
    }

    let recent = &history[..history.len().min(3)];
    let scores: Vec<f64> = recent.iter().map(|r| r.overall_score).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let consistency = if scores.len() > 1 {
        let variance =
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
        1.0 - variance.sqrt()
    } else {
        1.0
    };

    if mean >= 0.85 && consistency > 0.8 {
        DifficultyLevel::Advanced
    } else if mean >= 0.70 && consistency > 0.6 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnscope_model::KnowledgeArea;
    use learnscope_test_utils::result_days_ago;

    fn history(scores: &[f64]) -> Vec<QuizResult> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                result_days_ago(
                    &format!("s{i}"),
                    "u1",
                    &[(KnowledgeArea::MlBasics, score)],
                    i as i64,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_history_is_beginner() {
        assert_eq!(suggest_difficulty(&[]), DifficultyLevel::Beginner);
    }

    #[test]
    fn test_three_perfect_scores_is_advanced() {
        let h = history(&[1.0, 1.0, 1.0]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Advanced);
    }

    #[test]
    fn test_single_strong_result_is_advanced() {
        // One result has consistency 1.0 by definition.
        let h = history(&[0.9]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Advanced);
    }

    #[test]
    fn test_solid_but_not_stellar_is_intermediate() {
        let h = history(&[0.75, 0.72, 0.78]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Intermediate);
    }

    #[test]
    fn test_erratic_history_drops_to_beginner() {
        // Mean 0.70 clears the intermediate bar, but the spread wrecks
        // consistency (std dev ~0.42, consistency ~0.58).
        let h = history(&[1.0, 1.0, 0.1]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Beginner);
    }

    #[test]
    fn test_only_most_recent_three_count() {
        // Old failures beyond the window are ignored.
        let h = history(&[1.0, 1.0, 1.0, 0.1, 0.1, 0.1]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Advanced);
    }

    #[test]
    fn test_low_mean_is_beginner() {
        let h = history(&[0.5, 0.55, 0.5]);
        assert_eq!(suggest_difficulty(&h), DifficultyLevel::Beginner);
    }
}
