//! Multiple-choice questions with construction-time validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::area::{DifficultyLevel, KnowledgeArea};

/// Errors raised while constructing a [`Question`].
#[derive(Debug, Clone, Error)]
pub enum QuestionError {
    /// The designated correct key is not one of the option keys.
    #[error("question {id}: correct answer key '{key}' is not among the options")]
    CorrectKeyNotInOptions {
        /// Question identifier.
        id: u32,
        /// The offending answer key.
        key: String,
    },

    /// A question must offer at least two options.
    #[error("question {id}: needs at least two options, got {count}")]
    TooFewOptions {
        /// Question identifier.
        id: u32,
        /// Number of options supplied.
        count: usize,
    },
}

/// A single multiple-choice question. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within a bank.
    pub id: u32,
    /// Prompt text shown to the learner.
    pub question_text: String,
    /// Option key (e.g. "a") to option text. Keys are unique by construction.
    pub options: BTreeMap<String, String>,
    /// The correct option key. Always present in `options`.
    pub correct_answer: String,
    /// Topic tag for per-area scoring.
    pub knowledge_area: KnowledgeArea,
    /// Difficulty tier of this question.
    pub difficulty_level: DifficultyLevel,
    /// Optional explanation; [`Question::explanation`] derives one if absent.
    pub explanation: Option<String>,
}

impl Question {
    /// Build a question, validating that the correct key is a real option.
    ///
    /// A correct key outside the option map is a data invariant violation
    /// and is rejected here rather than coerced.
    pub fn new(
        id: u32,
        question_text: impl Into<String>,
        options: BTreeMap<String, String>,
        correct_answer: impl Into<String>,
        knowledge_area: KnowledgeArea,
        difficulty_level: DifficultyLevel,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                count: options.len(),
            });
        }
        if !options.contains_key(&correct_answer) {
            return Err(QuestionError::CorrectKeyNotInOptions {
                id,
                key: correct_answer,
            });
        }
        Ok(Self {
            id,
            question_text: question_text.into(),
            options,
            correct_answer,
            knowledge_area,
            difficulty_level,
            explanation,
        })
    }

    /// Check a submitted answer key against the correct key, case-insensitively.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.eq_ignore_ascii_case(&self.correct_answer)
    }

    /// The stored explanation, or a deterministic default derived from the
    /// area and the correct option text.
    pub fn explanation(&self) -> String {
        if let Some(ref text) = self.explanation {
            return text.clone();
        }
        let correct_text = self
            .options
            .get(&self.correct_answer)
            .map(String::as_str)
            .unwrap_or_default();
        format!(
            "{} The correct answer is '{}' because it represents the standard approach in this domain.",
            area_context(self.knowledge_area),
            correct_text
        )
    }
}

/// One-sentence context used by the default explanation.
fn area_context(area: KnowledgeArea) -> &'static str {
    match area {
        KnowledgeArea::MlBasics => "This covers basic machine learning principles and evaluation metrics.",
        KnowledgeArea::DeepLearning => "This involves fundamental deep learning concepts and architectures.",
        KnowledgeArea::Pytorch => "This covers PyTorch framework operations and tensor manipulations.",
        KnowledgeArea::Transformers => "This relates to transformer architecture and tokenization concepts.",
        KnowledgeArea::Gans => "This involves understanding GAN components and training dynamics.",
        KnowledgeArea::GenerativeAi => "This pertains to generative AI models and their applications.",
    }
}
