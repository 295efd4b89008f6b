//! Quiz sessions: the mutable record of one attempt, frozen at completion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::question::Question;

/// Errors raised by session mutations.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// An answer was submitted for a question not in this session.
    #[error("session {session}: question {question} is not part of this session")]
    UnknownQuestion {
        /// Session identifier.
        session: String,
        /// The unknown question id.
        question: u32,
    },

    /// The session was already completed.
    #[error("session {session}: already completed")]
    AlreadyCompleted {
        /// Session identifier.
        session: String,
    },
}

/// Which slice of the question bank a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Short curated subset.
    #[default]
    Demo,
    /// The full bank.
    Full,
}

/// One quiz attempt by one learner.
///
/// The question sequence is fixed at creation. The answer map grows
/// monotonically (re-answering overwrites) and only ever holds ids from the
/// question sequence. Completion happens exactly once; afterwards the
/// session is read-only and is the sole input to scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    /// Unique session identifier, generated at creation.
    pub session_id: String,
    /// Owning learner.
    pub user_id: String,
    /// Ordered question sequence for this attempt.
    pub questions: Vec<Question>,
    /// Question id to submitted answer key.
    pub answers: BTreeMap<u32, String>,
    /// When the attempt started.
    pub started_at: DateTime<Utc>,
    /// Set exactly once, at completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Bank slice this session drew from.
    pub mode: SessionMode,
}

impl QuizSession {
    /// Create a new session with a generated identifier.
    pub fn new(user_id: impl Into<String>, questions: Vec<Question>, mode: SessionMode) -> Self {
        let session = Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            questions,
            answers: BTreeMap::new(),
            started_at: Utc::now(),
            completed_at: None,
            mode,
        };
        tracing::debug!(
            session = %session.session_id,
            user = %session.user_id,
            questions = session.questions.len(),
            "created quiz session"
        );
        session
    }

    /// Record (or overwrite) the learner's answer for a question.
    ///
    /// Rejects ids outside the session's question sequence and submissions
    /// after completion.
    pub fn record_answer(&mut self, question_id: u32, answer: impl Into<String>) -> Result<(), SessionError> {
        if self.completed_at.is_some() {
            return Err(SessionError::AlreadyCompleted {
                session: self.session_id.clone(),
            });
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(SessionError::UnknownQuestion {
                session: self.session_id.clone(),
                question: question_id,
            });
        }
        self.answers.insert(question_id, answer.into());
        Ok(())
    }

    /// Mark the session completed. Fails on a second call.
    pub fn complete(&mut self) -> Result<(), SessionError> {
        if self.completed_at.is_some() {
            return Err(SessionError::AlreadyCompleted {
                session: self.session_id.clone(),
            });
        }
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Whether the session has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Fraction of questions answered so far. Zero for an empty session.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len() as f64 / self.questions.len() as f64
    }
}
