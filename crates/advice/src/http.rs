//! HTTP-backed advice prompter speaking an Ollama-style generate API.
//!
//! The transport is async; the [`AdvicePrompter`] impl wraps each call in a
//! throwaway current-thread runtime so the synchronous engine pipeline can
//! use it directly. Every request carries a bounded timeout so the
//! recommendation pipeline can never block indefinitely on the
//! collaborator.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use learnscope_model::{DifficultyLevel, KnowledgeArea};

use crate::AdvicePrompter;

/// Environment variable naming the generate endpoint.
pub const ENV_ENDPOINT: &str = "LEARNSCOPE_ADVICE_URL";
/// Environment variable naming the model. Optional.
pub const ENV_MODEL: &str = "LEARNSCOPE_ADVICE_MODEL";
/// Model used when `LEARNSCOPE_ADVICE_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "qwen2.5:1.5b-instruct";
/// Bound on any single generate request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prompt for per-area advice. `{area}`, `{performance}` and `{level}` are
/// substituted before sending.
const ADVICE_PROMPT: &str = "You are an expert in {area} within machine learning and AI.

A student has achieved {performance}% performance in this area at {level} level.

Provide specific, encouraging advice that includes:
1. What they're doing well
2. Key concepts to focus on next
3. Practical exercises to improve
4. Common pitfalls to avoid

Keep the advice motivational and actionable.";

/// Prompt for concept explanations. `{concept}` and `{level}` are
/// substituted before sending.
const EXPLAIN_PROMPT: &str = "Explain the concept of \"{concept}\" at {level} level.

Guidelines:
- For beginner: use simple language, analogies, and basic examples
- For intermediate: include technical details and practical applications
- For advanced: discuss nuances, research developments, and complex implementations

Provide a clear, engaging explanation that builds understanding progressively.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Prompter backed by an Ollama-style `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAdvicePrompter {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl HttpAdvicePrompter {
    /// Build a prompter with the default request timeout.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT)
    }

    /// Build a prompter with an explicit request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build advice HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
        })
    }

    /// Build from the environment, or `None` when no endpoint is configured.
    ///
    /// Absent configuration is the normal offline case, not an error; the
    /// caller falls back to rule-based advice.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(ENV_ENDPOINT).ok()?;
        let endpoint = endpoint.trim().to_string();
        if endpoint.is_empty() {
            return None;
        }
        let model =
            std::env::var(ENV_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        match Self::new(endpoint, model) {
            Ok(prompter) => Some(prompter),
            Err(e) => {
                warn!(error = %e, "advice prompter misconfigured, using fallback");
                None
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("advice request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("advice endpoint returned {}", response.status()));
        }
        let body: GenerateResponse = response
            .json()
            .await
            .context("advice response was not valid JSON")?;
        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(anyhow!("advice endpoint returned empty text"));
        }
        Ok(text)
    }

    /// Async variant of [`AdvicePrompter::advice_for`].
    pub async fn advice_for_async(&self, area: KnowledgeArea, score: f64) -> Result<String> {
        let performance = format!("{:.0}", score * 100.0);
        let prompt = ADVICE_PROMPT
            .replace("{area}", area.label())
            .replace("{performance}", &performance)
            .replace("{level}", prompt_level(score));
        debug!(area = %area, score, "requesting personalized advice");
        self.generate(&prompt).await
    }

    /// Async variant of [`AdvicePrompter::explain`].
    pub async fn explain_async(&self, concept: &str, level: DifficultyLevel) -> Result<String> {
        let prompt = EXPLAIN_PROMPT
            .replace("{concept}", concept)
            .replace("{level}", level.label());
        self.generate(&prompt).await
    }
}

/// Tier label used purely for prompt framing. Note the bands differ from
/// the performance-tier thresholds on purpose.
fn prompt_level(score: f64) -> &'static str {
    if score < 0.6 {
        "beginner"
    } else if score < 0.8 {
        "intermediate"
    } else {
        "advanced"
    }
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start advice runtime")?;
    Ok(runtime.block_on(future))
}

impl AdvicePrompter for HttpAdvicePrompter {
    fn advice_for(&self, area: KnowledgeArea, score: f64) -> Result<String> {
        block_on(self.advice_for_async(area, score))?
    }

    fn explain(&self, concept: &str, level: DifficultyLevel) -> Result<String> {
        block_on(self.explain_async(concept, level))?
    }
}
