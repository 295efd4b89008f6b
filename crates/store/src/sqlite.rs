//! SQLite-backed store. One connection behind a mutex; collection-valued
//! columns are stored as JSON text, timestamps as RFC 3339 text.

use std::path::Path;

use chrono::{DateTime, Utc};
use learnscope_model::{Confidence, QuizResult, QuizSession, Recommendation};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::{HistoryStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS quiz_sessions (
    session_id   TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    questions    TEXT NOT NULL,
    answers      TEXT NOT NULL,
    started_at   TEXT NOT NULL,
    completed_at TEXT,
    mode         TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS quiz_results (
    session_id              TEXT PRIMARY KEY,
    user_id                 TEXT NOT NULL,
    completed_at            TEXT NOT NULL,
    overall_score           REAL NOT NULL,
    area_scores             TEXT NOT NULL,
    knowledge_gaps          TEXT NOT NULL,
    performance             TEXT NOT NULL,
    recommendations_needed  TEXT NOT NULL,
    total_questions         INTEGER NOT NULL,
    correct_answers         INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS recommendations (
    session_id     TEXT NOT NULL,
    priority       INTEGER NOT NULL,
    area           TEXT NOT NULL,
    resources      TEXT NOT NULL,
    estimated_time TEXT NOT NULL,
    confidence     REAL NOT NULL,
    advice         TEXT NOT NULL,
    PRIMARY KEY (session_id, priority)
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON quiz_sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_results_user ON quiz_results(user_id);
";

/// Durable store over a single SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if absent) the database at `path` and ensure the
    /// schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.as_ref().display(), "opened quiz store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database. Data is lost on drop.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| StoreError::Timestamp { value, source })
}

// Raw quiz_results row before the JSON and timestamp columns are decoded.
type RawResult = (
    String, // session_id
    String, // user_id
    String, // completed_at
    f64,    // overall_score
    String, // area_scores
    String, // knowledge_gaps
    String, // performance
    String, // recommendations_needed
    i64,    // total_questions
    i64,    // correct_answers
);

const RESULT_COLUMNS: &str = "session_id, user_id, completed_at, overall_score, area_scores, \
     knowledge_gaps, performance, recommendations_needed, total_questions, correct_answers";

fn raw_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawResult> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn decode_result(raw: RawResult) -> Result<QuizResult, StoreError> {
    Ok(QuizResult {
        session_id: raw.0,
        user_id: raw.1,
        completed_at: parse_timestamp(raw.2)?,
        overall_score: raw.3,
        area_scores: serde_json::from_str(&raw.4)?,
        knowledge_gaps: serde_json::from_str(&raw.5)?,
        performance: serde_json::from_str(&raw.6)?,
        recommendations_needed: serde_json::from_str(&raw.7)?,
        total_questions: raw.8 as usize,
        correct_answers: raw.9 as usize,
    })
}

impl HistoryStore for SqliteStore {
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO quiz_sessions
             (session_id, user_id, questions, answers, started_at, completed_at, mode)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.session_id,
                session.user_id,
                serde_json::to_string(&session.questions)?,
                serde_json::to_string(&session.answers)?,
                session.started_at.to_rfc3339(),
                session.completed_at.map(|t| t.to_rfc3339()),
                serde_json::to_string(&session.mode)?,
            ],
        )?;
        Ok(())
    }

    fn load_session(&self, session_id: &str) -> Result<Option<QuizSession>, StoreError> {
        let conn = self.conn.lock();
        let raw: Option<(String, String, String, String, String, Option<String>, String)> = conn
            .query_row(
                "SELECT session_id, user_id, questions, answers, started_at, completed_at, mode
                 FROM quiz_sessions WHERE session_id = ?1",
                params![session_id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .optional()?;

        let Some(raw) = raw else { return Ok(None) };
        Ok(Some(QuizSession {
            session_id: raw.0,
            user_id: raw.1,
            questions: serde_json::from_str(&raw.2)?,
            answers: serde_json::from_str(&raw.3)?,
            started_at: parse_timestamp(raw.4)?,
            completed_at: raw.5.map(parse_timestamp).transpose()?,
            mode: serde_json::from_str(&raw.6)?,
        }))
    }

    fn save_result(&self, result: &QuizResult) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO quiz_results
             (session_id, user_id, completed_at, overall_score, area_scores,
              knowledge_gaps, performance, recommendations_needed,
              total_questions, correct_answers)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                result.session_id,
                result.user_id,
                result.completed_at.to_rfc3339(),
                result.overall_score,
                serde_json::to_string(&result.area_scores)?,
                serde_json::to_string(&result.knowledge_gaps)?,
                serde_json::to_string(&result.performance)?,
                serde_json::to_string(&result.recommendations_needed)?,
                result.total_questions as i64,
                result.correct_answers as i64,
            ],
        )?;
        debug!(session = %result.session_id, "saved quiz result");
        Ok(())
    }

    fn load_result(&self, session_id: &str) -> Result<Option<QuizResult>, StoreError> {
        let conn = self.conn.lock();
        let raw = conn
            .query_row(
                &format!("SELECT {RESULT_COLUMNS} FROM quiz_results WHERE session_id = ?1"),
                params![session_id],
                raw_result,
            )
            .optional()?;
        raw.map(decode_result).transpose()
    }

    fn load_history(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESULT_COLUMNS} FROM quiz_results WHERE user_id = ?1"
        ))?;
        let raws = stmt
            .query_map(params![user_id], raw_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut results = raws
            .into_iter()
            .map(decode_result)
            .collect::<Result<Vec<_>, _>>()?;
        // RFC 3339 text does not sort reliably across fractional-second
        // precision, so order after decoding.
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }

    fn all_results(&self) -> Result<Vec<QuizResult>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {RESULT_COLUMNS} FROM quiz_results"))?;
        let raws = stmt
            .query_map([], raw_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(decode_result).collect()
    }

    fn save_recommendations(
        &self,
        session_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM recommendations WHERE session_id = ?1",
            params![session_id],
        )?;
        for rec in recommendations {
            tx.execute(
                "INSERT INTO recommendations
                 (session_id, priority, area, resources, estimated_time, confidence, advice)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session_id,
                    rec.priority as i64,
                    serde_json::to_string(&rec.area)?,
                    serde_json::to_string(&rec.resources)?,
                    rec.estimated_time,
                    rec.confidence.value(),
                    rec.advice,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_recommendations(&self, session_id: &str) -> Result<Vec<Recommendation>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT area, priority, resources, estimated_time, confidence, advice
             FROM recommendations WHERE session_id = ?1 ORDER BY priority ASC",
        )?;
        let raws = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raws.into_iter()
            .map(|(area, priority, resources, estimated_time, confidence, advice)| {
                Ok(Recommendation {
                    area: serde_json::from_str(&area)?,
                    priority: priority as usize,
                    resources: serde_json::from_str(&resources)?,
                    estimated_time,
                    confidence: Confidence::new(confidence),
                    advice,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnscope_model::{DifficultyLevel, KnowledgeArea, SessionMode};
    use learnscope_test_utils::{question, result_days_ago, session};

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_session_round_trip() {
        let store = store();
        let mut s = session("u1", vec![question(1, KnowledgeArea::MlBasics)]);
        s.record_answer(1, "a").unwrap();
        store.save_session(&s).unwrap();

        let loaded = store.load_session(&s.session_id).unwrap().unwrap();
        assert_eq!(loaded.user_id, "u1");
        assert_eq!(loaded.answers.get(&1).map(String::as_str), Some("a"));
        assert_eq!(loaded.mode, SessionMode::Demo);
        assert!(loaded.completed_at.is_none());

        s.complete().unwrap();
        store.save_session(&s).unwrap();
        let reloaded = store.load_session(&s.session_id).unwrap().unwrap();
        assert!(reloaded.completed_at.is_some());
    }

    #[test]
    fn test_missing_rows_are_none_or_empty() {
        let store = store();
        assert!(store.load_session("nope").unwrap().is_none());
        assert!(store.load_result("nope").unwrap().is_none());
        assert!(store.load_recommendations("nope").unwrap().is_empty());
        assert!(store.load_history("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_result_round_trip_preserves_collections() {
        let store = store();
        let r = result_days_ago(
            "s1",
            "u1",
            &[
                (KnowledgeArea::MlBasics, 0.9),
                (KnowledgeArea::Gans, 0.3),
            ],
            1,
        );
        store.save_result(&r).unwrap();

        let loaded = store.load_result("s1").unwrap().unwrap();
        assert_eq!(loaded.area_scores, r.area_scores);
        assert_eq!(loaded.knowledge_gaps, vec![KnowledgeArea::Gans]);
        assert_eq!(loaded.performance, r.performance);
        assert_eq!(loaded.completed_at, r.completed_at);
    }

    #[test]
    fn test_save_result_is_an_upsert() {
        let store = store();
        store
            .save_result(&result_days_ago("s1", "u1", &[(KnowledgeArea::Pytorch, 0.2)], 3))
            .unwrap();
        store
            .save_result(&result_days_ago("s1", "u1", &[(KnowledgeArea::Pytorch, 0.8)], 1))
            .unwrap();

        let all = store.all_results().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].area_scores.get(&KnowledgeArea::Pytorch),
            Some(&0.8)
        );
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let store = store();
        store
            .save_result(&result_days_ago("old", "u1", &[(KnowledgeArea::MlBasics, 0.5)], 10))
            .unwrap();
        store
            .save_result(&result_days_ago("new", "u1", &[(KnowledgeArea::MlBasics, 0.9)], 1))
            .unwrap();
        store
            .save_result(&result_days_ago("other", "u2", &[(KnowledgeArea::MlBasics, 0.4)], 5))
            .unwrap();

        let history = store.load_history("u1").unwrap();
        let ids: Vec<&str> = history.iter().map(|r| r.session_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_recommendations_replace_previous_set() {
        let store = store();
        let rec = |area, priority| Recommendation {
            area,
            priority,
            resources: vec!["Course".to_string()],
            estimated_time: "1-2 weeks".to_string(),
            confidence: Confidence::new(0.8),
            advice: "Practice more".to_string(),
        };

        store
            .save_recommendations(
                "s1",
                &[rec(KnowledgeArea::Gans, 1), rec(KnowledgeArea::Pytorch, 2)],
            )
            .unwrap();
        store
            .save_recommendations("s1", &[rec(KnowledgeArea::Transformers, 1)])
            .unwrap();

        let loaded = store.load_recommendations("s1").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].area, KnowledgeArea::Transformers);
        assert_eq!(loaded[0].priority, 1);
        assert_eq!(loaded[0].confidence.value(), 0.8);
    }

    #[test]
    fn test_on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .save_result(&result_days_ago("s1", "u1", &[(KnowledgeArea::MlBasics, 0.7)], 1))
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load_result("s1").unwrap().unwrap();
        assert_eq!(loaded.user_id, "u1");
        assert_eq!(loaded.performance, DifficultyLevel::Intermediate);
    }
}
