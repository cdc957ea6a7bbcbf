//! Indexing of enhanced content into the profile store.

use crate::enhance::EnhancedContent;
use crate::error::IngestError;
use profile_store::{EmbeddingsProvider, ProfileStore};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

/// Sink for enhanced content. Object-safe so the pipeline can run against
/// fakes in tests.
pub trait DatabasePopulator: Send + Sync {
    fn populate<'a>(
        &'a self,
        entity_id: &'a str,
        content: &'a EnhancedContent,
    ) -> Pin<Box<dyn Future<Output = Result<(), IngestError>> + Send + 'a>>;
}

/// Populator backed by the Qdrant profile store. Re-ingesting an entity
/// supersedes its previous sections rather than merging with them.
pub struct StorePopulator {
    store: ProfileStore,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl StorePopulator {
    pub fn new(store: ProfileStore, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { store, embedder }
    }
}

impl DatabasePopulator for StorePopulator {
    fn populate<'a>(
        &'a self,
        entity_id: &'a str,
        content: &'a EnhancedContent,
    ) -> Pin<Box<dyn Future<Output = Result<(), IngestError>> + Send + 'a>> {
        Box::pin(async move {
            let written = self
                .store
                .replace_entity_sections(self.embedder.as_ref(), entity_id, &content.sections)
                .await?;
            info!(entity_id, sections = written, "profile indexed");
            Ok(())
        })
    }
}
