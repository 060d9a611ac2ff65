//! Answer generation with graceful fallback.
//!
//! The generator never surfaces an error to the caller. A missing API key
//! yields a fixed notice, and any provider failure yields the retrieved
//! fragments unchanged.

use tracing::{error, info, warn};
use tutor_core::config::GeminiConfig;

use crate::prompt::build_prompt;
use crate::provider::{LlmError, LlmProvider};
use crate::providers::create_provider;

/// Answer lines returned when no generation credential is configured.
pub const NOT_CONFIGURED_MESSAGE: [&str; 2] = [
    "AI service is not configured properly.",
    "Missing Gemini API key.",
];

/// What happened when asking the provider for an answer.
#[derive(Debug)]
pub enum Generation {
    /// Trimmed model output; may be empty.
    Answer(String),
    /// No provider configured; the network was not contacted.
    NotConfigured,
    /// The single attempt failed.
    Failed(LlmError),
}

impl Generation {
    /// Resolve into answer lines, falling back to `fragments` on failure.
    pub fn into_answer(self, fragments: &[String]) -> Vec<String> {
        match self {
            Generation::Answer(text) => vec![text],
            Generation::NotConfigured => {
                NOT_CONFIGURED_MESSAGE.iter().map(|s| s.to_string()).collect()
            }
            Generation::Failed(_) => fragments.to_vec(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Generation::Answer(_) => "generated",
            Generation::NotConfigured => "not_configured",
            Generation::Failed(_) => "fallback",
        }
    }
}

pub struct AnswerGenerator {
    provider: Option<Box<dyn LlmProvider>>,
}

impl AnswerGenerator {
    pub fn new(provider: Option<Box<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    /// Build from config. A missing key leaves the generator unconfigured;
    /// a client build failure is logged and treated the same way.
    pub fn from_config(config: &GeminiConfig) -> Self {
        match create_provider(config) {
            Ok(provider) => {
                info!("Answer generator ready (provider: {}, model: {})", provider.name(), config.model);
                Self::new(Some(provider))
            }
            Err(LlmError::NotConfigured(reason)) => {
                warn!("Answer generator disabled: {}", reason);
                Self::new(None)
            }
            Err(e) => {
                error!("Answer generator disabled, provider init failed: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// One attempt, no retry.
    pub async fn generate(&self, query: &str, fragments: &[String]) -> Generation {
        let Some(provider) = &self.provider else {
            return Generation::NotConfigured;
        };

        let prompt = build_prompt(query, fragments);
        match provider.complete(&prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!("{} returned blank candidate text", provider.name());
                }
                Generation::Answer(text.to_string())
            }
            Err(e) => {
                error!("{} error: {}", provider.name(), e);
                Generation::Failed(e)
            }
        }
    }
}
