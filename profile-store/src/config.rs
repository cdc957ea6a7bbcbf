//! Runtime and collection configuration.

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for the profile index.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Embedding dimensionality of the collection. Must match the
    /// embedding model used at ingestion time.
    pub vector_size: usize,
    /// Upsert batch size.
    pub upsert_batch: usize,
}

impl StoreConfig {
    /// Creates a sane default config for a given collection and endpoint.
    pub fn new_default(
        url: impl Into<String>,
        collection: impl Into<String>,
        vector_size: usize,
    ) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            vector_size,
            upsert_batch: 64,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(StoreError::Config("vector_size must be > 0".into()));
        }
        if self.upsert_batch == 0 {
            return Err(StoreError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(StoreConfig::new_default("http://localhost:6334", "catalyzator", 1536)
            .validate()
            .is_ok());
    }

    #[test]
    fn zero_vector_size_is_rejected() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "catalyzator", 0);
        assert!(cfg.validate().is_err());
    }
}
