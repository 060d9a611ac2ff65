pub mod answer;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use answer::{AnswerGenerator, Generation, NOT_CONFIGURED_MESSAGE};
pub use prompt::build_prompt;
pub use provider::{LlmError, LlmProvider};
pub use providers::gemini::GeminiProvider;
