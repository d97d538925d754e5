use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::backend_client::{ServiceClient, ServiceError};
use crate::integrations::IntegrationError;
use crate::models::{ContentStore, CustomSection, ResumeDocument};

/// Body of the analysis call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub resume_data: ResumeSnapshot,
    pub job_role: String,
    pub experience_level: String,
}

/// Content and custom sections, with the photo stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshot {
    #[serde(flatten)]
    pub content: ContentStore,
    pub custom_sections: Vec<CustomSection>,
}

impl ResumeSnapshot {
    pub fn of(doc: &ResumeDocument) -> Self {
        let mut content = doc.content.clone();
        content.personal_info.photo = None;
        Self {
            content,
            custom_sections: doc.custom_sections.iter().cloned().collect(),
        }
    }
}

/// Passed through to the client as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<Value>,
    #[serde(default)]
    pub match_percentage: Option<f64>,
}

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ServiceError>;
}

#[derive(Clone)]
pub struct HttpResumeAnalyzer {
    client: ServiceClient,
}

impl HttpResumeAnalyzer {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeAnalyzer for HttpResumeAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ServiceError> {
        self.client.post_json("resumes/analyze", request).await
    }
}

pub async fn analyze(
    analyzer: &dyn ResumeAnalyzer,
    doc: &ResumeDocument,
    job_role: &str,
    experience_level: &str,
) -> Result<AnalysisReport, IntegrationError> {
    let job_role = job_role.trim();
    if job_role.is_empty() {
        return Err(IntegrationError::BlankJobRole);
    }
    let request = AnalysisRequest {
        resume_data: ResumeSnapshot::of(doc),
        job_role: job_role.to_string(),
        experience_level: experience_level.trim().to_string(),
    };
    let report = analyzer.analyze(&request).await?;
    info!(
        "Analysis for '{}' scored {:?}",
        request.job_role, report.score
    );
    Ok(report)
}
