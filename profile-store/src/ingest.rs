//! Population: embed section drafts and write them as points.
//!
//! Re-ingesting an entity supersedes its previous profile: all existing
//! points for the entity are deleted before the new ones are upserted.
//! Point ids are deterministic (UUIDv5 of `entity_id/title`), so a given
//! entity/section pair always maps to the same point.

use crate::config::StoreConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::filters::{to_qdrant_filter, SectionFilter};
use crate::qdrant_facade::QdrantFacade;
use crate::section::SectionDraft;

use qdrant_client::qdrant::{value, PointId, PointStruct, Value as QValue, Vector};
use qdrant_client::Payload;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Replaces the entity's indexed profile with `drafts`.
///
/// # Errors
/// Returns embedding failures, dimension mismatches, or Qdrant failures.
pub async fn replace_entity_sections(
    cfg: &StoreConfig,
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    entity_id: &str,
    drafts: &[SectionDraft],
) -> Result<u64, StoreError> {
    info!(
        "Replacing profile for entity '{}' with {} sections",
        entity_id,
        drafts.len()
    );

    client.ensure_collection(cfg.vector_size).await?;

    // Supersede, never merge: drop the previous profile first.
    client
        .delete_by_filter(to_qdrant_filter(&SectionFilter::entity(entity_id)))
        .await?;

    if drafts.is_empty() {
        debug!("No sections to ingest for entity '{}'", entity_id);
        return Ok(0);
    }

    let mut total = 0u64;
    for chunk in drafts.chunks(cfg.upsert_batch.max(1)) {
        let mut points = Vec::with_capacity(chunk.len());
        for draft in chunk {
            points.push(build_point(cfg, provider, entity_id, draft).await?);
        }
        total += client.upsert_points(points).await?;
    }

    info!("Ingested {} sections for entity '{}'", total, entity_id);
    Ok(total)
}

async fn build_point(
    cfg: &StoreConfig,
    provider: &dyn EmbeddingsProvider,
    entity_id: &str,
    draft: &SectionDraft,
) -> Result<PointStruct, StoreError> {
    let vector = provider.embed(&draft.embedding_text()).await?;
    if vector.len() != cfg.vector_size {
        return Err(StoreError::VectorSizeMismatch {
            got: vector.len(),
            want: cfg.vector_size,
        });
    }

    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert("entity_id".into(), qstring(entity_id));
    payload.insert("title".into(), qstring(draft.title.as_str()));
    payload.insert("summary".into(), qstring(&draft.summary));
    payload.insert("notes".into(), qstring(&draft.notes));
    payload.insert("analysis".into(), qstring(&draft.analysis));
    payload.insert(
        "actionable_gap_analysis".into(),
        qstring(&draft.actionable_gap_analysis),
    );

    let pid: PointId = stable_uuid(&format!("{}/{}", entity_id, draft.title))
        .to_string()
        .into();

    Ok(PointStruct::new(
        pid,
        Vector::from(vector),
        Payload::from(payload),
    ))
}

fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionTitle;
    use std::future::Future;
    use std::pin::Pin;

    struct FixedEmbedder(Vec<f32>);

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            let v = self.0.clone();
            Box::pin(async move { Ok(v) })
        }
    }

    #[tokio::test]
    async fn built_points_carry_a_stable_id_payload_and_vector() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "catalyzator", 3);
        let draft = SectionDraft {
            title: SectionTitle::Problem,
            summary: "s".into(),
            notes: "n".into(),
            analysis: "a".into(),
            actionable_gap_analysis: "g".into(),
        };

        let embedder = FixedEmbedder(vec![0.1, 0.2, 0.3]);
        let point = build_point(&cfg, &embedder, "e-1", &draft).await.unwrap();

        let want_id: PointId = stable_uuid(&format!("e-1/{}", SectionTitle::Problem))
            .to_string()
            .into();
        assert_eq!(point.id, Some(want_id));
        assert!(point.vectors.is_some());
        assert_eq!(
            point.payload.get("title"),
            Some(&qstring(SectionTitle::Problem.as_str()))
        );
    }

    #[test]
    fn point_ids_are_stable_per_entity_and_title() {
        let a = stable_uuid(&format!("e-1/{}", SectionTitle::Problem));
        let b = stable_uuid(&format!("e-1/{}", SectionTitle::Problem));
        let c = stable_uuid(&format!("e-2/{}", SectionTitle::Problem));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
