//! Data model for the learnscope assessment engine.
//!
//! This crate provides:
//! - The closed knowledge-area taxonomy and difficulty ladder
//! - Validated question and quiz-session types
//! - Derived result and recommendation types consumed by the engine
//! - Question bank loading from JSON files

pub mod area;
pub mod bank;
pub mod question;
pub mod recommendation;
pub mod result;
pub mod session;

pub use area::{DifficultyLevel, KnowledgeArea};
pub use bank::{BankError, BankStatistics, QuestionBank};
pub use question::{Question, QuestionError};
pub use recommendation::{Confidence, Recommendation};
pub use result::QuizResult;
pub use session::{QuizSession, SessionError, SessionMode};
