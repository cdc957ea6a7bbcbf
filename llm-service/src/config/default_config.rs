//! Default LLM configs loaded from environment variables.
//!
//! Two roles are needed by the backend:
//!
//! - **Completion** → answer generation and relevance judgments
//! - **Embedding**  → query/section embedding for the profile index
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`   = API key (mandatory)
//! - `OPENAI_URL`       = API base URL (default `https://api.openai.com`)
//! - `OPENAI_MODEL`     = completion model (default `gpt-4o`)
//! - `EMBEDDING_MODEL`  = embedding model (default `text-embedding-3-small`)
//! - `LLM_TEMPERATURE`, `LLM_TOP_P`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{env_opt_f32, env_opt_u32, env_or, must_env, Result},
};

fn openai_endpoint() -> String {
    env_or("OPENAI_URL", "https://api.openai.com")
}

fn timeout_secs() -> Result<u64> {
    Ok(env_opt_u32("LLM_TIMEOUT_SECS")?.map(u64::from).unwrap_or(60))
}

/// Constructs the completion-model config from the environment.
///
/// # Defaults
/// - `model = "gpt-4o"`, `temperature = 0.7`, `top_p = 0.9`,
///   `max_tokens = 4000`, `timeout_secs = 60`
pub fn config_completion() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        model: env_or("OPENAI_MODEL", "gpt-4o"),
        endpoint: openai_endpoint(),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(4000)),
        temperature: Some(env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(0.7)),
        top_p: Some(env_opt_f32("LLM_TOP_P")?.unwrap_or(0.9)),
        timeout_secs: Some(timeout_secs()?),
    })
}

/// Constructs the embedding-model config from the environment.
///
/// Sampling knobs stay unset; only the model and transport matter here.
pub fn config_embedding() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
        endpoint: openai_endpoint(),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout_secs()?),
    })
}
