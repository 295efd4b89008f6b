//! In-memory store for tests and demo runs. Same contract as the SQLite
//! backend, no durability.

use std::collections::HashMap;

use learnscope_model::{QuizResult, QuizSession, Recommendation};
use parking_lot::Mutex;

use crate::{HistoryStore, StoreError};

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, QuizSession>,
    results: HashMap<String, QuizResult>,
    recommendations: HashMap<String, Vec<Recommendation>>,
}

/// Volatile store keyed entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError> {
        self.inner
            .lock()
            .sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    fn load_session(&self, session_id: &str) -> Result<Option<QuizSession>, StoreError> {
        Ok(self.inner.lock().sessions.get(session_id).cloned())
    }

    fn save_result(&self, result: &QuizResult) -> Result<(), StoreError> {
        self.inner
            .lock()
            .results
            .insert(result.session_id.clone(), result.clone());
        Ok(())
    }

    fn load_result(&self, session_id: &str) -> Result<Option<QuizResult>, StoreError> {
        Ok(self.inner.lock().results.get(session_id).cloned())
    }

    fn load_history(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let mut results: Vec<QuizResult> = self
            .inner
            .lock()
            .results
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }

    fn all_results(&self) -> Result<Vec<QuizResult>, StoreError> {
        Ok(self.inner.lock().results.values().cloned().collect())
    }

    fn save_recommendations(
        &self,
        session_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), StoreError> {
        self.inner
            .lock()
            .recommendations
            .insert(session_id.to_string(), recommendations.to_vec());
        Ok(())
    }

    fn load_recommendations(&self, session_id: &str) -> Result<Vec<Recommendation>, StoreError> {
        Ok(self
            .inner
            .lock()
            .recommendations
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }
}
