//! Innovator-profile index over Qdrant.
//!
//! This crate provides a clean API to:
//! - Populate an entity's profile sections (supersede-on-reingest)
//! - Search sections by vector similarity with entity/title filtering
//! - Browse sections by filter without ranking
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules.

mod config;
pub mod embed;
mod errors;
mod filters;
mod ingest;
mod qdrant_facade;
mod retrieve;
mod section;

pub use config::{DistanceKind, StoreConfig};
pub use embed::EmbeddingsProvider;
pub use errors::StoreError;
pub use filters::SectionFilter;
pub use ingest::stable_uuid;
pub use section::{ProfileSection, SectionDraft, SectionTitle};

use tracing::trace;

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct ProfileStore {
    cfg: StoreConfig,
    client: qdrant_facade::QdrantFacade,
}

impl ProfileStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` or `StoreError::Qdrant` if client
    /// initialization fails.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        trace!("ProfileStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Replaces the entity's indexed sections with `drafts`.
    ///
    /// # Errors
    /// Returns embedding, dimension-mismatch, or Qdrant failures.
    pub async fn replace_entity_sections(
        &self,
        provider: &dyn EmbeddingsProvider,
        entity_id: &str,
        drafts: &[SectionDraft],
    ) -> Result<u64, StoreError> {
        ingest::replace_entity_sections(&self.cfg, &self.client, provider, entity_id, drafts).await
    }

    /// Similarity search over an entity's sections.
    ///
    /// Results are ordered by descending score; a title filter that comes
    /// back short is topped up with an unfiltered fetch.
    pub async fn search_sections(
        &self,
        provider: &dyn EmbeddingsProvider,
        filter: &SectionFilter,
        query_text: &str,
        limit: u64,
        score_threshold: f32,
    ) -> Result<Vec<ProfileSection>, StoreError> {
        retrieve::search_sections(
            &self.client,
            provider,
            filter,
            query_text,
            limit,
            score_threshold,
        )
        .await
    }

    /// Unranked fetch of sections matching `filter`.
    pub async fn scroll_sections(
        &self,
        filter: &SectionFilter,
        limit: u32,
    ) -> Result<Vec<ProfileSection>, StoreError> {
        retrieve::scroll_sections(&self.client, filter, limit).await
    }
}
