//! Innovator-profile ingestion pipeline: collect → enhance → populate.
//!
//! Raw transport (file storage, form database) and binary content
//! extraction live behind traits; this crate orchestrates them, turns the
//! collected material into canonical profile sections via an LLM
//! due-diligence report, and indexes the sections for retrieval.

mod collect;
mod enhance;
mod error;
mod populate;

pub use collect::{
    CollectedData, ContentExtractor, FILE_KEYS, FormCollector, FormDatabaseProvider,
    FormStorageProvider, find_file_refs,
};
pub use enhance::{
    ContentEnhancer, EnhancedContent, build_report_prompt, parse_report, remove_file_data,
};
pub use error::IngestError;
pub use populate::{DatabasePopulator, StorePopulator};

use tracing::info;

/// Coordinates the ingestion stages for one entity at a time.
pub struct IngestionPipeline<'a> {
    collector: FormCollector<'a>,
    enhancer: ContentEnhancer,
    populator: &'a dyn DatabasePopulator,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(
        collector: FormCollector<'a>,
        enhancer: ContentEnhancer,
        populator: &'a dyn DatabasePopulator,
    ) -> Self {
        Self {
            collector,
            enhancer,
            populator,
        }
    }

    /// Runs the full pipeline for one entity.
    pub async fn process_entity(&self, entity_id: &str) -> Result<(), IngestError> {
        let collected = self.collector.collect(entity_id).await?;
        let enhanced = self.enhancer.process(&collected).await?;
        self.populator.populate(entity_id, &enhanced).await?;
        info!(entity_id, "entity ingested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::{CompletionProvider, Result as LlmResult};
    use serde_json::{Value, json};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct MemoryStorage;

    impl FormStorageProvider for MemoryStorage {
        fn download_file<'a>(
            &'a self,
            _storage_path: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, IngestError>> + Send + 'a>> {
            Box::pin(async { Ok(b"pitch deck text".to_vec()) })
        }

        fn file_from_url<'a>(
            &'a self,
            url: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, IngestError>> + Send + 'a>> {
            Box::pin(async move {
                if url.contains("broken") {
                    Err(IngestError::Storage(format!("404 for {url}")))
                } else {
                    Ok(b"downloaded bytes".to_vec())
                }
            })
        }
    }

    struct MemoryDatabase;

    impl FormDatabaseProvider for MemoryDatabase {
        fn entity<'a>(
            &'a self,
            entity_id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Value, IngestError>> + Send + 'a>> {
            Box::pin(async move {
                Ok(json!({"id": entity_id, "name": "Acme", "members": ["u1", "u2"]}))
            })
        }

        fn user<'a>(
            &'a self,
            user_id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, IngestError>> + Send + 'a>>
        {
            Box::pin(async move {
                // u2 is unresolvable and silently dropped
                Ok((user_id == "u1").then(|| json!({"id": "u1", "name": "Dana"})))
            })
        }

        fn form_submissions<'a>(
            &'a self,
            _entity_id: &'a str,
            _form_id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Value>, IngestError>> + Send + 'a>>
        {
            Box::pin(async {
                Ok(vec![json!({
                    "data": {
                        "company": "Acme",
                        "deck": {"filename": "deck.pdf", "path": "uploads/deck.pdf"},
                        "broken": {"filename": "gone.pdf", "url": "http://broken/gone.pdf"}
                    }
                })])
            })
        }
    }

    struct TextExtractor;

    impl ContentExtractor for TextExtractor {
        fn extract_text(
            &self,
            contents: &[u8],
            _filename: &str,
        ) -> Result<Option<String>, IngestError> {
            Ok(Some(String::from_utf8_lossy(contents).into_owned()))
        }
    }

    struct ReportLlm;

    impl CompletionProvider for ReportLlm {
        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = LlmResult<String>> + Send + 'a>> {
            Box::pin(async {
                Ok("## Introduction\n### Summary\nAcme automates widgets.\n### Notes\n- n\n### Detailed Analysis\na\n### Actionable Gap Analysis\ng\n".to_string())
            })
        }
    }

    #[derive(Default)]
    struct RecordingPopulator {
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl DatabasePopulator for RecordingPopulator {
        fn populate<'a>(
            &'a self,
            entity_id: &'a str,
            content: &'a EnhancedContent,
        ) -> Pin<Box<dyn Future<Output = Result<(), IngestError>> + Send + 'a>> {
            self.seen
                .lock()
                .unwrap()
                .push((entity_id.to_string(), content.sections.len()));
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn pipeline_runs_end_to_end_despite_a_broken_file() {
        let storage = MemoryStorage;
        let database = MemoryDatabase;
        let extractor = TextExtractor;
        let populator = RecordingPopulator::default();

        let collector = FormCollector::new(
            &storage,
            &database,
            &extractor,
            FormCollector::DEFAULT_FORM_ID,
        );
        let pipeline = IngestionPipeline::new(
            collector,
            ContentEnhancer::new(std::sync::Arc::new(ReportLlm)),
            &populator,
        );

        pipeline.process_entity("acme").await.unwrap();

        let seen = populator.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("acme".to_string(), 1)]);
    }

    #[tokio::test]
    async fn collector_expands_members_and_extracts_files() {
        let storage = MemoryStorage;
        let database = MemoryDatabase;
        let extractor = TextExtractor;
        let collector = FormCollector::new(
            &storage,
            &database,
            &extractor,
            FormCollector::DEFAULT_FORM_ID,
        );

        let collected = collector.collect("acme").await.unwrap();
        let members = collected.entity["members"].as_array().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["name"], "Dana");
        // the broken URL is skipped, the path-based file survives
        assert_eq!(collected.file_contents.len(), 1);
        assert_eq!(
            collected.file_contents.get("deck.pdf").map(String::as_str),
            Some("pitch deck text")
        );
    }
}
