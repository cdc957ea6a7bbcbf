//! Runtime configuration loaded from environment variables.

use crate::provider::SearchConfig;
use profile_store::StoreConfig;

/// Config bag for the answering pipeline. All fields have defaults via
/// `from_env`.
#[derive(Clone, Debug)]
pub struct AnsweringConfig {
    // Retrieval knobs
    pub min_relevance_score: f32,
    pub max_sections: usize,

    // ProfileStore config (host, collection, vector size)
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub collection: String,
    pub embedding_dim: usize,
}

impl AnsweringConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            min_relevance_score: parse("MIN_RELEVANCE_SCORE", 0.6f32),
            max_sections: parse("MAX_SECTIONS", 3usize),

            qdrant_url: env("QDRANT_URL", "http://localhost:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: env("QDRANT_COLLECTION", "catalyzator"),
            embedding_dim: parse("EMBEDDING_DIM", 1536usize),
        }
    }

    /// Convert to a `profile_store::StoreConfig` used by `ProfileStore`.
    pub fn make_store_config(&self) -> StoreConfig {
        let mut cfg =
            StoreConfig::new_default(&self.qdrant_url, &self.collection, self.embedding_dim);
        cfg.qdrant_api_key = self.qdrant_api_key.clone();
        cfg
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            min_relevance_score: self.min_relevance_score,
            max_sections: self.max_sections,
        }
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
