//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use crate::config::{DistanceKind, StoreConfig};
use crate::errors::StoreError;

use qdrant_client::qdrant::{
    vector_output, vectors_output::VectorsOptions, CreateCollectionBuilder, DeletePointsBuilder,
    Distance, Filter, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, VectorParamsBuilder, VectorsOutput,
};
use qdrant_client::Qdrant;
use tracing::{debug, info, warn};

/// A scored hit returned by vector search.
pub struct ScoredHit {
    pub score: f32,
    pub payload: serde_json::Value,
    pub vector: Vec<f32>,
}

/// An unscored point returned by scrolling.
pub struct ScrolledPoint {
    pub payload: serde_json::Value,
    pub vector: Vec<f32>,
}

/// A facade over the Qdrant client to keep the rest of the code clean and stable.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the configured vector space.
    pub async fn ensure_collection(&self, vector_size: usize) -> Result<(), StoreError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, vector_size, self.distance
        );

        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size as u64, distance)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Upserts (inserts or updates) a batch of points into the collection.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<u64, StoreError> {
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(0);
        }

        info!(
            "Upserting {} points into collection '{}'",
            points.len(),
            self.collection
        );

        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        debug!("Upsert operation result={:?}", res.result);

        Ok(res.result.and_then(|r| r.operation_id).unwrap_or(0))
    }

    /// Deletes every point matching `filter`.
    pub async fn delete_by_filter(&self, filter: Filter) -> Result<(), StoreError> {
        info!("Deleting points from '{}' by filter", self.collection);
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;
        Ok(())
    }

    /// Performs a similarity search, returning hits sorted by descending score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<Filter>,
        score_threshold: Option<f32>,
    ) -> Result<Vec<ScoredHit>, StoreError> {
        info!(
            "Searching in '{}' with limit={} threshold={:?}",
            self.collection, limit, score_threshold
        );

        let mut builder = SearchPointsBuilder::new(&self.collection, vector, limit)
            .with_payload(true)
            .with_vectors(true);

        if let Some(f) = filter {
            builder = builder.filter(f);
        }
        if let Some(t) = score_threshold {
            builder = builder.score_threshold(t);
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for r in res.result.into_iter() {
            out.push(ScoredHit {
                score: r.score,
                payload: qpayload_to_json(r.payload),
                vector: vectors_to_vec(r.vectors),
            });
        }

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }

    /// Fetches points matching `filter` without vector ranking.
    pub async fn scroll(
        &self,
        filter: Filter,
        limit: u32,
    ) -> Result<Vec<ScrolledPoint>, StoreError> {
        info!("Scrolling '{}' with limit={}", self.collection, limit);

        let res = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .filter(filter)
                    .limit(limit)
                    .with_payload(true)
                    .with_vectors(true),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for r in res.result.into_iter() {
            out.push(ScrolledPoint {
                payload: qpayload_to_json(r.payload),
                vector: vectors_to_vec(r.vectors),
            });
        }

        debug!("Scroll completed: {} points returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Unsupported nested objects/arrays are mapped to `Null`; the profile
/// payload is flat strings.
fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}

/// Extracts the dense vector from a Qdrant `VectorsOutput` wrapper.
fn vectors_to_vec(v: Option<VectorsOutput>) -> Vec<f32> {
    let Some(VectorsOptions::Vector(v)) = v.and_then(|v| v.vectors_options) else {
        return Vec::new();
    };
    match v.vector {
        Some(vector_output::Vector::Dense(dense)) => dense.data,
        Some(_) => Vec::new(),
        // Servers predating the typed vector oneof only fill the legacy field.
        #[allow(deprecated)]
        None => v.data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::{DenseVector, VectorOutput};

    #[test]
    fn dense_search_vectors_unwrap_to_plain_floats() {
        let out = VectorsOutput {
            vectors_options: Some(VectorsOptions::Vector(VectorOutput {
                vector: Some(vector_output::Vector::Dense(DenseVector {
                    data: vec![0.1, 0.2, 0.3],
                })),
                ..Default::default()
            })),
        };
        assert_eq!(vectors_to_vec(Some(out)), vec![0.1, 0.2, 0.3]);
        assert!(vectors_to_vec(None).is_empty());
    }

    #[test]
    fn legacy_dense_vectors_are_still_read() {
        #[allow(deprecated)]
        let out = VectorsOutput {
            vectors_options: Some(VectorsOptions::Vector(VectorOutput {
                data: vec![1.0, 2.0],
                ..Default::default()
            })),
        };
        assert_eq!(vectors_to_vec(Some(out)), vec![1.0, 2.0]);
    }
}
