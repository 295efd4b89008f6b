//! Question bank loading from JSON files.
//!
//! The bank file holds the full question list plus the ids of a curated
//! demo subset:
//!
//! ```json
//! { "questions": [ ... ], "demo_questions": [1, 4, 9] }
//! ```
//!
//! Selection randomization is a policy of the caller, not the bank; both
//! [`QuestionBank::select`] variants preserve file order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::area::{DifficultyLevel, KnowledgeArea};
use crate::question::{Question, QuestionError};
use crate::session::SessionMode;

/// Errors raised while loading a bank file.
#[derive(Debug, Error)]
pub enum BankError {
    /// The bank file could not be read.
    #[error("failed to read question bank {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bank file is not valid JSON in the expected shape.
    #[error("failed to parse question bank {path}: {source}")]
    Parse {
        /// Offending path.
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A question in the bank violates a construction invariant.
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

#[derive(Deserialize)]
struct RawQuestion {
    id: u32,
    question_text: String,
    options: BTreeMap<String, String>,
    correct_answer: String,
    knowledge_area: KnowledgeArea,
    difficulty_level: DifficultyLevel,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct BankFile {
    questions: Vec<RawQuestion>,
    #[serde(default)]
    demo_questions: Vec<u32>,
}

/// An immutable, validated question bank.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    demo_ids: Vec<u32>,
}

impl QuestionBank {
    /// Load and validate a bank from a JSON file.
    ///
    /// Missing explanations are backfilled with the deterministic per-area
    /// default so every stored question carries one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: BankFile = serde_json::from_str(&text).map_err(|source| BankError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let mut questions = Vec::with_capacity(file.questions.len());
        for raw in file.questions {
            let mut question = Question::new(
                raw.id,
                raw.question_text,
                raw.options,
                raw.correct_answer,
                raw.knowledge_area,
                raw.difficulty_level,
                raw.explanation,
            )?;
            if question.explanation.is_none() {
                question.explanation = Some(question.explanation());
            }
            questions.push(question);
        }

        tracing::info!(
            path = %path.display(),
            questions = questions.len(),
            demo = file.demo_questions.len(),
            "loaded question bank"
        );
        Ok(Self {
            questions,
            demo_ids: file.demo_questions,
        })
    }

    /// All questions in file order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Select the slice of the bank for a session mode, in file order.
    pub fn select(&self, mode: SessionMode) -> Vec<Question> {
        match mode {
            SessionMode::Full => self.questions.clone(),
            SessionMode::Demo => self
                .questions
                .iter()
                .filter(|q| self.demo_ids.contains(&q.id))
                .cloned()
                .collect(),
        }
    }

    /// Distribution statistics over the bank.
    pub fn statistics(&self) -> BankStatistics {
        let mut by_area: BTreeMap<KnowledgeArea, usize> = BTreeMap::new();
        let mut by_difficulty: BTreeMap<DifficultyLevel, usize> = BTreeMap::new();
        for question in &self.questions {
            *by_area.entry(question.knowledge_area).or_insert(0) += 1;
            *by_difficulty.entry(question.difficulty_level).or_insert(0) += 1;
        }
        let coverage = by_area.len() as f64 / KnowledgeArea::ALL.len() as f64;
        BankStatistics {
            total_questions: self.questions.len(),
            by_area,
            by_difficulty,
            coverage,
        }
    }
}

/// How the bank's questions are distributed over areas and difficulties.
#[derive(Debug, Clone)]
pub struct BankStatistics {
    /// Total number of questions in the bank.
    pub total_questions: usize,
    /// Question count per area.
    pub by_area: BTreeMap<KnowledgeArea, usize>,
    /// Question count per difficulty tier.
    pub by_difficulty: BTreeMap<DifficultyLevel, usize>,
    /// Fraction of the taxonomy covered by at least one question.
    pub coverage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BANK_JSON: &str = r#"{
        "questions": [
            {
                "id": 1,
                "question_text": "What does tokenizer.encode() return?",
                "options": {"a": "Tokens", "b": "Token IDs"},
                "correct_answer": "b",
                "knowledge_area": "transformers",
                "difficulty_level": "beginner"
            },
            {
                "id": 2,
                "question_text": "Which component generates samples in a GAN?",
                "options": {"a": "Generator", "b": "Discriminator"},
                "correct_answer": "a",
                "knowledge_area": "gans",
                "difficulty_level": "intermediate",
                "explanation": "The generator maps noise to samples."
            }
        ],
        "demo_questions": [2]
    }"#;

    fn write_bank(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_backfills_explanations() {
        let file = write_bank(BANK_JSON);
        let bank = QuestionBank::load(file.path()).unwrap();
        assert_eq!(bank.questions().len(), 2);
        assert!(bank.questions()[0].explanation.is_some());
        assert_eq!(
            bank.questions()[1].explanation.as_deref(),
            Some("The generator maps noise to samples.")
        );
    }

    #[test]
    fn test_select_demo_subset() {
        let file = write_bank(BANK_JSON);
        let bank = QuestionBank::load(file.path()).unwrap();
        let demo = bank.select(SessionMode::Demo);
        assert_eq!(demo.len(), 1);
        assert_eq!(demo[0].id, 2);
        assert_eq!(bank.select(SessionMode::Full).len(), 2);
    }

    #[test]
    fn test_invalid_correct_key_is_fatal() {
        let bad = BANK_JSON.replace("\"correct_answer\": \"b\"", "\"correct_answer\": \"z\"");
        let file = write_bank(&bad);
        assert!(matches!(
            QuestionBank::load(file.path()),
            Err(BankError::InvalidQuestion(_))
        ));
    }

    #[test]
    fn test_statistics() {
        let file = write_bank(BANK_JSON);
        let bank = QuestionBank::load(file.path()).unwrap();
        let stats = bank.statistics();
        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.by_area.get(&KnowledgeArea::Gans), Some(&1));
        assert!((stats.coverage - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            QuestionBank::load("/nonexistent/bank.json"),
            Err(BankError::Io { .. })
        ));
    }
}
