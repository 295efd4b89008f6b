//! Deterministic rule-based advice, used whenever the prompter is absent
//! or failing. Total: always returns non-empty text.

use learnscope_model::{DifficultyLevel, KnowledgeArea};

/// Fixed per-area advice opener.
fn area_template(area: KnowledgeArea) -> &'static str {
    match area {
        KnowledgeArea::MlBasics => "Review core concepts like supervised/unsupervised learning",
        KnowledgeArea::DeepLearning => "Strengthen fundamentals in neural network architectures",
        KnowledgeArea::Pytorch => "Practice tensor operations and autograd functionality",
        KnowledgeArea::Transformers => {
            "Focus on understanding attention mechanisms and positional encoding"
        }
        KnowledgeArea::Gans => {
            "Start with basic GAN theory and gradually move to advanced architectures"
        }
        KnowledgeArea::GenerativeAi => {
            "Explore different generative models and their applications"
        }
    }
}

/// Severity-banded follow-up clause.
fn severity_clause(score: f64) -> &'static str {
    if score < 0.4 {
        "Start with basic tutorials and hands-on practice."
    } else if score < 0.7 {
        "Try intermediate projects and real-world applications."
    } else {
        "Explore advanced topics and research papers."
    }
}

/// Rule-based advice for an area at the given score.
pub fn fallback_advice(area: KnowledgeArea, score: f64) -> String {
    format!("{}. {}", area_template(area), severity_clause(score))
}

/// Rule-based concept explanation at the given level.
pub fn fallback_explanation(concept: &str, level: DifficultyLevel) -> String {
    format!(
        "This concept relates to {concept}. For {level} level understanding, \
         focus on practical applications and core principles."
    )
}
