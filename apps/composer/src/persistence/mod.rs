//! Persistence Adapter: maps the live document to the stored record and back, through
//! the remote persistence service.
//!
//! - `save` validates locally (blank name, 5 MiB payload ceiling) before any network call.
//! - `load` builds a fresh document; callers commit it only on success, so a failed load
//!   never touches the session.

pub mod client;
pub mod handlers;
pub mod record;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::backend_client::ServiceError;
use crate::models::ResumeDocument;

pub use client::HttpPersistenceService;
pub use record::ResumeRecord;

pub const MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Please enter a resume name")]
    BlankName,

    #[error("Resume is {size} bytes; the limit is {limit} bytes. Try a smaller photo.")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Stored resume is malformed: {0}")]
    InvalidRecord(String),

    #[error("Could not encode resume: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// What the persistence service returns for one résumé.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    #[serde(default)]
    pub resume_name: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub is_dynamic: Option<bool>,
    /// Either the record object or the record JSON-encoded as a string.
    #[serde(default)]
    pub resume_data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResume {
    #[serde(alias = "_id", alias = "id")]
    pub resume_id: String,
}

#[derive(Debug, Clone)]
pub struct LoadedResume {
    pub resume_id: String,
    pub resume_name: String,
    pub document: ResumeDocument,
}

/// The remote store. Carried in `AppState` as `Arc<dyn PersistenceService>`.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn get_resume_by_id(&self, id: &str) -> Result<StoredResume, ServiceError>;

    async fn save_resume(&self, record: &ResumeRecord) -> Result<SavedResume, ServiceError>;
}

/// Serialized size of the record as it would go over the wire.
pub fn encoded_size(record: &ResumeRecord) -> Result<usize, PersistError> {
    Ok(serde_json::to_vec(record)?.len())
}

/// Validates and builds the record for `doc` without sending it.
pub fn build_record(
    doc: &ResumeDocument,
    resume_name: &str,
    editing_id: Option<&str>,
) -> Result<ResumeRecord, PersistError> {
    if resume_name.trim().is_empty() {
        return Err(PersistError::BlankName);
    }
    let record = ResumeRecord::from_document(doc, resume_name, editing_id);
    let size = encoded_size(&record)?;
    if size > MAX_PAYLOAD_BYTES {
        return Err(PersistError::PayloadTooLarge {
            size,
            limit: MAX_PAYLOAD_BYTES,
        });
    }
    debug!("Resume record is {size} bytes");
    Ok(record)
}

/// Saves `doc` and returns the id assigned (or confirmed) by the service.
pub async fn save(
    service: &dyn PersistenceService,
    doc: &ResumeDocument,
    resume_name: &str,
    editing_id: Option<&str>,
) -> Result<String, PersistError> {
    let record = build_record(doc, resume_name, editing_id)?;
    let saved = service.save_resume(&record).await?;
    info!(
        "Saved resume '{}' as {} ({})",
        record.resume_name,
        saved.resume_id,
        if editing_id.is_some() { "update" } else { "create" }
    );
    Ok(saved.resume_id)
}

/// Fetches résumé `id` and rebuilds a document from it.
pub async fn load(service: &dyn PersistenceService, id: &str) -> Result<LoadedResume, PersistError> {
    let stored = service.get_resume_by_id(id).await?;
    let record = decode_record(stored.resume_data)?;

    let resume_name = if stored.resume_name.trim().is_empty() {
        record.resume_name.clone()
    } else {
        stored.resume_name
    };
    let document = record.into_document(stored.template_name.as_deref());
    info!("Loaded resume '{resume_name}' ({id})");

    Ok(LoadedResume {
        resume_id: id.to_string(),
        resume_name,
        document,
    })
}

fn decode_record(data: Value) -> Result<ResumeRecord, PersistError> {
    let data = match data {
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| PersistError::InvalidRecord(format!("resumeData string: {e}")))?,
        Value::Null => return Err(PersistError::InvalidRecord("resumeData is missing".into())),
        other => other,
    };
    serde_json::from_value(data).map_err(|e| PersistError::InvalidRecord(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::editor::transitions::{
        add_custom_item, add_skill, create_custom_section, move_up, select_template, toggle,
        update_custom_item,
    };
    use crate::models::{CustomKind, TemplateKind};

    /// Stores records in memory, keyed by the id it hands out.
    #[derive(Default)]
    pub(crate) struct MemoryPersistence {
        pub records: Mutex<Vec<(String, ResumeRecord)>>,
        pub calls: Mutex<usize>,
        pub fail: bool,
        pub encode_as_string: bool,
    }

    #[async_trait]
    impl PersistenceService for MemoryPersistence {
        async fn get_resume_by_id(&self, id: &str) -> Result<StoredResume, ServiceError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(ServiceError::Unavailable { attempts: 3 });
            }
            let records = self.records.lock().unwrap();
            let (_, record) = records
                .iter()
                .find(|(stored_id, _)| stored_id == id)
                .ok_or(ServiceError::Api {
                    status: 404,
                    message: "Resume not found".into(),
                })?;
            let value = serde_json::to_value(record)?;
            let resume_data = if self.encode_as_string {
                Value::String(value.to_string())
            } else {
                value
            };
            Ok(StoredResume {
                resume_name: record.resume_name.clone(),
                template_name: Some(record.template.clone()),
                is_dynamic: Some(true),
                resume_data,
            })
        }

        async fn save_resume(&self, record: &ResumeRecord) -> Result<SavedResume, ServiceError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(ServiceError::Unavailable { attempts: 3 });
            }
            let mut records = self.records.lock().unwrap();
            let id = match &record.resume_id {
                Some(id) => {
                    records.retain(|(stored_id, _)| stored_id != id);
                    id.clone()
                }
                None => format!("r-{}", records.len() + 1),
            };
            records.push((id.clone(), record.clone()));
            Ok(SavedResume { resume_id: id })
        }
    }

    fn edited_document() -> ResumeDocument {
        let doc = add_skill(&ResumeDocument::default(), "Rust").unwrap();
        let (doc, id) = create_custom_section(&doc, "Awards", CustomKind::List).unwrap();
        let (doc, item) = add_custom_item(&doc, &id).unwrap();
        let doc = update_custom_item(&doc, &id, &item, "Best paper").unwrap();
        let doc = toggle(&move_up(&doc, 6), "projects");
        select_template(&doc, TemplateKind::TwoSide, Some("#7c3aed")).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load_reconstructs_document() {
        let service = MemoryPersistence::default();
        let doc = edited_document();

        let id = save(&service, &doc, "Backend CV", None).await.unwrap();
        let loaded = load(&service, &id).await.unwrap();

        assert_eq!(loaded.resume_id, id);
        assert_eq!(loaded.resume_name, "Backend CV");
        assert_eq!(loaded.document, doc);
    }

    #[tokio::test]
    async fn test_load_accepts_string_encoded_data() {
        let service = MemoryPersistence {
            encode_as_string: true,
            ..Default::default()
        };
        let doc = edited_document();
        let id = save(&service, &doc, "CV", None).await.unwrap();
        assert_eq!(load(&service, &id).await.unwrap().document, doc);
    }

    #[tokio::test]
    async fn test_save_with_editing_id_updates_in_place() {
        let service = MemoryPersistence::default();
        let doc = edited_document();
        let id = save(&service, &doc, "CV", None).await.unwrap();
        let again = save(&service, &doc, "CV v2", Some(&id)).await.unwrap();
        assert_eq!(again, id);
        assert_eq!(service.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_before_network() {
        let service = MemoryPersistence::default();
        let err = save(&service, &ResumeDocument::default(), "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::BlankName));
        assert_eq!(*service.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_payload_is_rejected_before_network() {
        let service = MemoryPersistence::default();
        let mut doc = ResumeDocument::default();
        doc.content.summary = "x".repeat(MAX_PAYLOAD_BYTES + 1);
        let err = save(&service, &doc, "CV", None).await.unwrap_err();
        assert!(matches!(err, PersistError::PayloadTooLarge { .. }));
        assert_eq!(*service.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_surfaces_as_service_error() {
        let service = MemoryPersistence {
            fail: true,
            ..Default::default()
        };
        let err = load(&service, "r-1").await.unwrap_err();
        assert!(matches!(err, PersistError::Service(_)));
    }

    #[test]
    fn test_decode_record_rejects_missing_data() {
        assert!(matches!(
            decode_record(Value::Null),
            Err(PersistError::InvalidRecord(_))
        ));
        assert!(matches!(
            decode_record(Value::String("{not json".into())),
            Err(PersistError::InvalidRecord(_))
        ));
    }
}
