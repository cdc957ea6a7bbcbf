use crate::errors::StoreError;
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation.
///
/// Async is required because real providers perform HTTP requests; the boxed
/// future keeps the trait object-safe so callers can hold `dyn` providers
/// and tests can supply fakes.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds `text` into the collection's vector space.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>>;
}

pub mod openai;
