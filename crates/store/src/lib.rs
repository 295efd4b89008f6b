//! Persistence for quiz sessions, results, and recommendations.
//!
//! Two backends implement the same [`HistoryStore`] trait: a durable
//! SQLite store and an in-memory store for tests and demos. The history
//! contract both uphold: `load_history` returns a learner's results
//! ordered most-recent-first by completion timestamp.

pub mod memory;
pub mod sqlite;

use learnscope_model::{QuizResult, QuizSession, Recommendation};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored JSON column failed to encode or decode.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored timestamp column was not valid RFC 3339.
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        /// The raw column value.
        value: String,
        /// Parse failure.
        source: chrono::ParseError,
    },
}

/// Storage interface for the quiz engine's collaborators.
///
/// Saves are idempotent upserts keyed on session id, so re-scoring a
/// session overwrites its previous result rather than duplicating it.
pub trait HistoryStore: Send + Sync {
    /// Persist a session, replacing any previous snapshot of it.
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError>;

    /// Load one session by id.
    fn load_session(&self, session_id: &str) -> Result<Option<QuizSession>, StoreError>;

    /// Persist a scored result, replacing any previous result for the
    /// same session.
    fn save_result(&self, result: &QuizResult) -> Result<(), StoreError>;

    /// Load the result for one session.
    fn load_result(&self, session_id: &str) -> Result<Option<QuizResult>, StoreError>;

    /// All results for one learner, most recent first.
    fn load_history(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError>;

    /// Every stored result, across all learners. This is the corpus the
    /// similarity engine compares against.
    fn all_results(&self) -> Result<Vec<QuizResult>, StoreError>;

    /// Persist the recommendations generated for a session, replacing
    /// any previously stored set.
    fn save_recommendations(
        &self,
        session_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), StoreError>;

    /// Load stored recommendations for a session, in priority order.
    fn load_recommendations(&self, session_id: &str) -> Result<Vec<Recommendation>, StoreError>;
}
