//! Hybrid context retrieval for a single question.
//!
//! Three routes contribute candidates: the keyword taxonomy, an LLM title
//! judgement, and vector similarity search. Candidates are merged, deduped
//! and capped before they reach the answer prompt.

use crate::model::{GrantQuestion, SearchResult};
use crate::parse::parse_title_list;
use crate::prompt::build_title_selection_prompt;
use crate::taxonomy::match_titles;
use llm_service::CompletionProvider;
use profile_store::{
    EmbeddingsProvider, ProfileSection, ProfileStore, SectionFilter, SectionTitle, StoreError,
};
use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieval knobs.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Minimum similarity score for vector-retrieved sections.
    pub min_relevance_score: f32,
    /// Hard cap on merged context size.
    pub max_sections: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_relevance_score: 0.6,
            max_sections: 3,
        }
    }
}

/// Read access to an entity's indexed profile. Object-safe so the answering
/// pipeline can run against fakes in tests.
pub trait ProfileSource: Send + Sync {
    /// Ranked similarity search, optionally narrowed to a title set.
    fn search<'a>(
        &'a self,
        entity_id: &'a str,
        query: &'a str,
        titles: Option<Vec<SectionTitle>>,
        limit: u64,
        score_threshold: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ProfileSection>, StoreError>> + Send + 'a>>;

    /// Unranked fetch by title set.
    fn browse<'a>(
        &'a self,
        entity_id: &'a str,
        titles: Vec<SectionTitle>,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ProfileSection>, StoreError>> + Send + 'a>>;
}

/// [`ProfileSource`] backed by the Qdrant-based profile store.
pub struct StoreProfileSource {
    store: ProfileStore,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl StoreProfileSource {
    pub fn new(store: ProfileStore, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { store, embedder }
    }
}

impl ProfileSource for StoreProfileSource {
    fn search<'a>(
        &'a self,
        entity_id: &'a str,
        query: &'a str,
        titles: Option<Vec<SectionTitle>>,
        limit: u64,
        score_threshold: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ProfileSection>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut filter = SectionFilter::entity(entity_id);
            if let Some(titles) = titles {
                filter = filter.with_titles(titles);
            }
            self.store
                .search_sections(self.embedder.as_ref(), &filter, query, limit, score_threshold)
                .await
        })
    }

    fn browse<'a>(
        &'a self,
        entity_id: &'a str,
        titles: Vec<SectionTitle>,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ProfileSection>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let filter = SectionFilter::entity(entity_id).with_titles(titles);
            self.store.scroll_sections(&filter, limit).await
        })
    }
}

/// Provides the merged profile context for answering one question.
pub struct InnovatorProfileProvider {
    source: Arc<dyn ProfileSource>,
    llm: Arc<dyn CompletionProvider>,
    config: SearchConfig,
}

impl InnovatorProfileProvider {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        llm: Arc<dyn CompletionProvider>,
        config: SearchConfig,
    ) -> Self {
        Self {
            source,
            llm,
            config,
        }
    }

    /// Composite search string; this, not the raw question, is what gets
    /// embedded, to maximize lexical overlap with the indexed summaries.
    fn composite_search_text(question: &GrantQuestion) -> String {
        format!(
            "Category: {}\nTitle: {}\nQuestion: {}\nAnswer Structure: {}\nContent Guidelines: {}",
            question.category,
            question.title,
            question.question,
            question.answer_structure_instructions,
            question.answer_content_instructions,
        )
    }

    /// Asks the model for candidate titles. A model failure is downgraded
    /// to "no suggestions" so it never aborts the question.
    async fn judged_titles(&self, question: &GrantQuestion) -> Vec<SectionTitle> {
        let prompt = build_title_selection_prompt(question);
        match self.llm.complete(&prompt).await {
            Ok(response) => parse_title_list(&response),
            Err(err) => {
                warn!(
                    identifier = %question.identifier,
                    error = %err,
                    "title judgement failed, continuing without LLM-suggested titles"
                );
                Vec::new()
            }
        }
    }

    /// Candidate titles from the taxonomy and the LLM judge. Empty when
    /// neither route matched anything.
    async fn candidate_titles(&self, question: &GrantQuestion) -> BTreeSet<SectionTitle> {
        let text = format!(
            "{} {} {}",
            question.category, question.title, question.question
        );
        let mut titles = match_titles(&text);
        titles.extend(self.judged_titles(question).await);
        titles
    }

    /// Retrieves and merges the profile context for `question`.
    ///
    /// An empty result is valid; the caller proceeds with an empty profile
    /// block rather than failing the question.
    pub async fn relevant_context(
        &self,
        entity_id: &str,
        question: &GrantQuestion,
    ) -> Result<SearchResult, StoreError> {
        let candidates = self.candidate_titles(question).await;
        let query = Self::composite_search_text(question);

        // Vector route: fall back to the full catalog when no candidate
        // titles matched, so similarity alone decides.
        let search_titles: Vec<SectionTitle> = if candidates.is_empty() {
            SectionTitle::ALL.to_vec()
        } else {
            candidates.iter().copied().collect()
        };

        let scored = self
            .source
            .search(
                entity_id,
                &query,
                Some(search_titles),
                self.config.max_sections as u64,
                self.config.min_relevance_score,
            )
            .await?;

        // Scroll route: only titles the taxonomy/judge actually nominated.
        let unscored = if candidates.is_empty() {
            Vec::new()
        } else {
            self.source
                .browse(
                    entity_id,
                    candidates.iter().copied().collect(),
                    self.config.max_sections as u32,
                )
                .await?
        };

        let merged = merge_sections(scored, unscored, self.config.max_sections);
        debug!(
            identifier = %question.identifier,
            sections = merged.sections.len(),
            "context retrieved"
        );
        Ok(merged)
    }
}

/// Merges scored (vector) and unscored (taxonomy/judge) candidates.
///
/// Dedupe key is (title, summary). Scored sections win slots first, highest
/// score first; unscored ones follow in title order. Pure.
pub fn merge_sections(
    scored: Vec<ProfileSection>,
    unscored: Vec<ProfileSection>,
    max: usize,
) -> SearchResult {
    let mut scored = scored;
    scored.sort_by(|a, b| {
        b.score
            .unwrap_or(f32::MIN)
            .partial_cmp(&a.score.unwrap_or(f32::MIN))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut unscored = unscored;
    unscored.sort_by_key(|s| s.title);

    let mut seen: HashSet<(SectionTitle, String)> = HashSet::new();
    let mut sections = Vec::new();
    for section in scored.into_iter().chain(unscored) {
        if sections.len() == max {
            break;
        }
        if seen.insert((section.title, section.summary.clone())) {
            sections.push(section);
        }
    }
    SearchResult { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: SectionTitle, summary: &str, score: Option<f32>) -> ProfileSection {
        ProfileSection {
            title,
            summary: summary.into(),
            notes: String::new(),
            analysis: String::new(),
            actionable_gap_analysis: String::new(),
            vector: vec![0.0; 4],
            score,
        }
    }

    #[test]
    fn merge_prefers_scored_sections() {
        let scored = vec![
            section(SectionTitle::Solution, "low", Some(0.61)),
            section(SectionTitle::BusinessModel, "high", Some(0.92)),
        ];
        let unscored = vec![section(SectionTitle::Introduction, "intro", None)];
        let merged = merge_sections(scored, unscored, 2);
        assert_eq!(merged.sections.len(), 2);
        assert_eq!(merged.sections[0].summary, "high");
        assert_eq!(merged.sections[1].summary, "low");
    }

    #[test]
    fn merge_dedupes_by_title_and_summary() {
        let scored = vec![section(SectionTitle::Solution, "same text", Some(0.8))];
        let unscored = vec![
            section(SectionTitle::Solution, "same text", None),
            section(SectionTitle::Solution, "different text", None),
        ];
        let merged = merge_sections(scored, unscored, 5);
        assert_eq!(merged.sections.len(), 2);
    }

    #[test]
    fn merge_caps_at_max() {
        let unscored = vec![
            section(SectionTitle::Introduction, "a", None),
            section(SectionTitle::Problem, "b", None),
            section(SectionTitle::Solution, "c", None),
            section(SectionTitle::Need, "d", None),
        ];
        let merged = merge_sections(Vec::new(), unscored, 3);
        assert_eq!(merged.sections.len(), 3);
    }

    #[test]
    fn merge_of_nothing_is_empty_and_valid() {
        let merged = merge_sections(Vec::new(), Vec::new(), 3);
        assert!(merged.sections.is_empty());
    }

    #[test]
    fn unscored_sections_come_out_in_title_order() {
        let unscored = vec![
            section(SectionTitle::TeamLeadership, "t", None),
            section(SectionTitle::Introduction, "i", None),
        ];
        let merged = merge_sections(Vec::new(), unscored, 5);
        assert_eq!(merged.sections[0].title, SectionTitle::Introduction);
    }
}
