pub mod gemini;

use std::time::Duration;

use tutor_core::config::GeminiConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the Gemini provider from config. A missing API key is reported as
/// `NotConfigured` so callers can run without generation.
pub fn create_provider(config: &GeminiConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let api_key = config
        .api_key
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
    Ok(Box::new(gemini::GeminiProvider::new(
        api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )?))
}
