//! Form-submission collection.
//!
//! Transport is behind traits: storage (file bytes), database (entity,
//! user and submission records) and content extraction (bytes to text).
//! The collector walks submissions for file references, downloads and
//! extracts each one, and swallows per-file failures so one broken upload
//! never loses the rest of the submission.

use crate::error::IngestError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Keys whose presence marks a JSON object as a file reference.
pub const FILE_KEYS: [&str; 4] = ["url", "filename", "path", "relativePath"];

/// Read access to uploaded file bytes.
pub trait FormStorageProvider: Send + Sync {
    fn download_file<'a>(
        &'a self,
        storage_path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, IngestError>> + Send + 'a>>;

    fn file_from_url<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, IngestError>> + Send + 'a>>;
}

/// Read access to entity, user and form-submission records.
pub trait FormDatabaseProvider: Send + Sync {
    fn entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, IngestError>> + Send + 'a>>;

    fn user<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, IngestError>> + Send + 'a>>;

    fn form_submissions<'a>(
        &'a self,
        entity_id: &'a str,
        form_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Value>, IngestError>> + Send + 'a>>;
}

/// Turns raw file bytes into text. Returns `Ok(None)` for formats the
/// extractor does not handle.
pub trait ContentExtractor: Send + Sync {
    fn extract_text(
        &self,
        contents: &[u8],
        filename: &str,
    ) -> Result<Option<String>, IngestError>;
}

/// Everything collected for one entity.
#[derive(Clone, Debug)]
pub struct CollectedData {
    /// Entity record with member ids expanded into user records.
    pub entity: Value,
    /// Raw form submissions.
    pub form_data: Vec<Value>,
    /// Extracted text per uploaded filename.
    pub file_contents: BTreeMap<String, String>,
}

/// Recursively finds file-reference objects in a nested structure.
pub fn find_file_refs(data: &Value) -> Vec<&Map<String, Value>> {
    let mut refs = Vec::new();
    walk_file_refs(data, &mut refs);
    refs
}

fn walk_file_refs<'a>(data: &'a Value, refs: &mut Vec<&'a Map<String, Value>>) {
    match data {
        Value::Object(map) => {
            if FILE_KEYS.iter().any(|key| map.contains_key(*key)) {
                refs.push(map);
            } else {
                for value in map.values() {
                    walk_file_refs(value, refs);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_file_refs(item, refs);
            }
        }
        _ => {}
    }
}

/// Collects form submissions and related files for an entity.
pub struct FormCollector<'a> {
    storage: &'a dyn FormStorageProvider,
    database: &'a dyn FormDatabaseProvider,
    extractor: &'a dyn ContentExtractor,
    form_id: String,
}

impl<'a> FormCollector<'a> {
    pub const DEFAULT_FORM_ID: &'static str = "innovator_introduction";

    pub fn new(
        storage: &'a dyn FormStorageProvider,
        database: &'a dyn FormDatabaseProvider,
        extractor: &'a dyn ContentExtractor,
        form_id: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            database,
            extractor,
            form_id: form_id.into(),
        }
    }

    /// Entity record with its `members` id list replaced by the member
    /// user records. Unresolvable member ids are dropped.
    async fn entity_info(&self, entity_id: &str) -> Result<Value, IngestError> {
        let mut entity = self.database.entity(entity_id).await?;

        let member_ids: Vec<String> = entity
            .get("members")
            .and_then(|m| m.as_array())
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut members = Vec::with_capacity(member_ids.len());
        for member_id in &member_ids {
            if let Some(user) = self.database.user(member_id).await? {
                members.push(user);
            }
        }
        if let Some(obj) = entity.as_object_mut() {
            obj.insert("members".to_string(), Value::Array(members));
        }
        Ok(entity)
    }

    /// Downloads and extracts one referenced file. `None` covers a
    /// reference without a usable location and extractor misses alike.
    async fn fetch_file_text(
        &self,
        file_ref: &Map<String, Value>,
    ) -> Result<Option<(String, String)>, IngestError> {
        let mut filename = file_ref
            .get("filename")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let contents = if let Some(url) = file_ref.get("url").and_then(|v| v.as_str()) {
            self.storage.file_from_url(url).await?
        } else if let Some(path) = file_ref
            .get("path")
            .or_else(|| file_ref.get("relativePath"))
            .and_then(|v| v.as_str())
        {
            if filename.is_empty() {
                filename = path.rsplit('/').next().unwrap_or(path).to_string();
            }
            self.storage.download_file(path).await?
        } else {
            return Ok(None);
        };

        Ok(self
            .extractor
            .extract_text(&contents, &filename)?
            .map(|text| (filename, text)))
    }

    /// Gathers entity info, form submissions and extracted file text.
    ///
    /// Per-file failures are logged and skipped; database failures
    /// propagate, since without the records there is nothing to ingest.
    pub async fn collect(&self, entity_id: &str) -> Result<CollectedData, IngestError> {
        let entity = self.entity_info(entity_id).await?;
        let form_data = self
            .database
            .form_submissions(entity_id, &self.form_id)
            .await?;

        let mut file_contents = BTreeMap::new();
        for submission in &form_data {
            for file_ref in find_file_refs(submission) {
                match self.fetch_file_text(file_ref).await {
                    Ok(Some((filename, text))) => {
                        file_contents.insert(filename, text);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(
                            filename = file_ref
                                .get("filename")
                                .and_then(|v| v.as_str())
                                .unwrap_or("<unnamed>"),
                            error = %err,
                            "file processing failed, skipping"
                        );
                    }
                }
            }
        }

        debug!(
            entity_id,
            submissions = form_data.len(),
            files = file_contents.len(),
            "form data collected"
        );
        Ok(CollectedData {
            entity,
            form_data,
            file_contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_file_refs_in_nested_structures() {
        let data = json!({
            "answers": [
                {"question": "pitch", "upload": {"filename": "deck.pdf", "url": "http://x/deck.pdf"}},
                {"question": "name", "value": "Acme"}
            ],
            "attachment": {"relativePath": "uploads/notes.txt"}
        });
        let refs = find_file_refs(&data);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn file_ref_object_is_not_descended_into() {
        // Once an object looks like a file ref, its children are not
        // scanned again.
        let data = json!({"filename": "a.txt", "nested": {"url": "http://x"}});
        assert_eq!(find_file_refs(&data).len(), 1);
    }

    #[test]
    fn scalars_yield_no_refs() {
        assert!(find_file_refs(&json!("just a string")).is_empty());
        assert!(find_file_refs(&json!(42)).is_empty());
    }
}
