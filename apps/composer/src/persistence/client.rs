use async_trait::async_trait;

use crate::backend_client::{ServiceClient, ServiceError};
use crate::persistence::{PersistenceService, ResumeRecord, SavedResume, StoredResume};

/// Persistence over the backend's `/resumes` endpoints.
#[derive(Clone)]
pub struct HttpPersistenceService {
    client: ServiceClient,
}

impl HttpPersistenceService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PersistenceService for HttpPersistenceService {
    async fn get_resume_by_id(&self, id: &str) -> Result<StoredResume, ServiceError> {
        self.client.get_json(&format!("resumes/{id}")).await
    }

    async fn save_resume(&self, record: &ResumeRecord) -> Result<SavedResume, ServiceError> {
        self.client.post_json("resumes", record).await
    }
}
