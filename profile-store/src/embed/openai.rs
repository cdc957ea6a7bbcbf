//! OpenAI embedding provider implementation.
//!
//! Delegates the HTTP call to `llm-service` and enforces the collection's
//! vector dimensionality. A mismatch means the configured embedding model
//! disagrees with the index schema — fatal, not retryable.

use std::sync::Arc;

use crate::{EmbeddingsProvider, StoreError};
use llm_service::OpenAiService;

/// OpenAI embedding provider (async).
#[derive(Clone)]
pub struct OpenAiEmbedder {
    svc: Arc<OpenAiService>,
    dim: usize,
}

impl OpenAiEmbedder {
    /// Wraps a configured embeddings client, pinning the expected dimension.
    pub fn new(svc: Arc<OpenAiService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let vector = self
                .svc
                .embeddings(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;

            if vector.len() != self.dim {
                return Err(StoreError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.dim,
                });
            }

            Ok(vector)
        })
    }
}
