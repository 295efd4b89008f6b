//! Text-generation collaborator for personalized learning advice.
//!
//! This crate provides:
//! - The [`AdvicePrompter`] contract the engine consumes
//! - An HTTP-backed prompter with a bounded request timeout
//! - A deterministic rule-based fallback that never fails
//! - An explicit, bounded, invalidate-able response cache
//!
//! The prompter is allowed to fail in any way (unreachable, misconfigured,
//! slow); callers recover with [`fallback::fallback_advice`] and never
//! surface the failure.

pub mod cache;
pub mod fallback;
pub mod http;

pub use cache::{AdviceCache, CachedPrompter};
pub use fallback::{fallback_advice, fallback_explanation};
pub use http::{HttpAdvicePrompter, DEFAULT_TIMEOUT};

use anyhow::Result;
use learnscope_model::{DifficultyLevel, KnowledgeArea};

/// Contract for the external text-generation collaborator.
///
/// Both operations may fail; calling code applies the documented fallback
/// on any failure, absent configuration, or timeout.
pub trait AdvicePrompter: Send + Sync {
    /// Personalized advice for one knowledge area given the learner's score.
    fn advice_for(&self, area: KnowledgeArea, score: f64) -> Result<String>;

    /// Explain a concept at the given difficulty level.
    fn explain(&self, concept: &str, level: DifficultyLevel) -> Result<String>;
}
