//! Retrieval helpers: similarity search with optional title filtering and
//! best-effort top-up, plus unranked browsing by filter.

use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::filters::{to_qdrant_filter, SectionFilter};
use crate::qdrant_facade::QdrantFacade;
use crate::section::ProfileSection;

use tracing::{trace, warn};

/// Embeds `query_text` and searches the entity's profile.
///
/// Results come back ordered by descending similarity score (Qdrant's
/// ordering is stable). When a title filter yields fewer than `limit`
/// sections, a second, unfiltered-by-title fetch tops up the remaining
/// quota — best-effort enrichment, skipped entirely without a title filter.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures. A dimension
/// mismatch from the provider surfaces unchanged.
pub async fn search_sections(
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    filter: &SectionFilter,
    query_text: &str,
    limit: u64,
    score_threshold: f32,
) -> Result<Vec<ProfileSection>, StoreError> {
    trace!(
        "retrieve::search_sections entity={} limit={limit} threshold={score_threshold}",
        filter.entity_id
    );

    let query_vector = provider.embed(query_text).await?;

    let hits = client
        .search(
            query_vector.clone(),
            limit,
            Some(to_qdrant_filter(filter)),
            Some(score_threshold),
        )
        .await?;

    let mut out: Vec<ProfileSection> = Vec::with_capacity(hits.len());
    for hit in hits {
        match ProfileSection::from_payload(&hit.payload, hit.vector, Some(hit.score)) {
            Some(section) => out.push(section),
            None => warn!("skipping point with non-canonical payload"),
        }
    }

    // Top up under a title filter that came back short.
    if filter.titles.is_some() && (out.len() as u64) < limit {
        let remaining = limit - out.len() as u64;
        let wide = SectionFilter::entity(filter.entity_id.clone());
        let extra = client
            .search(
                query_vector,
                remaining,
                Some(to_qdrant_filter(&wide)),
                Some(score_threshold),
            )
            .await?;
        for hit in extra {
            if let Some(section) =
                ProfileSection::from_payload(&hit.payload, hit.vector, Some(hit.score))
            {
                if !out
                    .iter()
                    .any(|s| s.title == section.title && s.summary == section.summary)
                {
                    out.push(section);
                }
            }
        }
    }

    trace!("retrieve::search_sections hits={}", out.len());
    Ok(out)
}

/// Fetches sections matching `filter` without vector ranking (no scores).
pub async fn scroll_sections(
    client: &QdrantFacade,
    filter: &SectionFilter,
    limit: u32,
) -> Result<Vec<ProfileSection>, StoreError> {
    trace!(
        "retrieve::scroll_sections entity={} limit={limit}",
        filter.entity_id
    );

    let points = client.scroll(to_qdrant_filter(filter), limit).await?;

    let mut out = Vec::with_capacity(points.len());
    for p in points {
        match ProfileSection::from_payload(&p.payload, p.vector, None) {
            Some(section) => out.push(section),
            None => warn!("skipping point with non-canonical payload"),
        }
    }
    Ok(out)
}
