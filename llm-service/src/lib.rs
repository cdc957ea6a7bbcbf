//! OpenAI-compatible LLM client used by the Catalyzator backend.
//!
//! One service struct ([`OpenAiService`]) covers every model role the system
//! needs: answer generation, relevance judgments, and embeddings. Callers that
//! only need text completion depend on the object-safe [`CompletionProvider`]
//! trait so they can be exercised with fakes.

pub mod config;
mod error_handler;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{
    ConfigError, HttpError, LlmError, ProviderError, ProviderErrorKind, Result,
};
pub use services::open_ai_service::OpenAiService;

use std::{future::Future, pin::Pin};

/// Single-prompt completion interface.
///
/// Async is expressed through boxed futures so the trait stays object-safe;
/// real providers perform HTTP requests.
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` to the model and returns the raw response text.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}
