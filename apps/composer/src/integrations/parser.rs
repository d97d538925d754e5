use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::backend_client::{ServiceClient, ServiceError};
use crate::editor::content::{EducationFields, ExperienceFields, PersonalInfoPatch, ProjectFields};
use crate::integrations::{IntegrationError, MAX_PDF_BYTES, PDF_CONTENT_TYPE};
use crate::models::ResumeDocument;

/// Partial résumé extracted from a PDF. Absent fields leave the document alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    #[serde(default)]
    pub personal_info: Option<PersonalInfoPatch>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub education: Option<Vec<EducationFields>>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceFields>>,
    #[serde(default)]
    pub projects: Option<Vec<ProjectFields>>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
}

#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse_pdf(&self, file_name: &str, bytes: Bytes) -> Result<ParsedResume, ServiceError>;
}

#[derive(Clone)]
pub struct HttpResumeParser {
    client: ServiceClient,
}

impl HttpResumeParser {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeParser for HttpResumeParser {
    async fn parse_pdf(&self, file_name: &str, bytes: Bytes) -> Result<ParsedResume, ServiceError> {
        self.client
            .post_file("resumes/parse", "file", file_name, PDF_CONTENT_TYPE, bytes)
            .await
    }
}

pub fn check_upload(content_type: &str, size: usize) -> Result<(), IntegrationError> {
    if !content_type.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return Err(IntegrationError::NotPdf(content_type.to_string()));
    }
    if size > MAX_PDF_BYTES {
        return Err(IntegrationError::TooLarge {
            size,
            limit: MAX_PDF_BYTES,
        });
    }
    Ok(())
}

/// Validates the upload and sends it to the parser. Merging is left to the caller so it
/// can be applied to whatever document is current when the parser answers.
pub async fn import_pdf(
    parser: &dyn ResumeParser,
    file_name: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<ParsedResume, IntegrationError> {
    check_upload(content_type, bytes.len())?;
    let parsed = parser.parse_pdf(file_name, bytes).await?;
    info!("Parsed '{file_name}'");
    Ok(parsed)
}

/// Every present field replaces the current one. Entries get fresh local ids; the photo,
/// custom sections and section order are kept.
pub fn merge_parsed(doc: &ResumeDocument, parsed: ParsedResume) -> ResumeDocument {
    let mut next = doc.clone();
    let content = &mut next.content;

    if let Some(patch) = parsed.personal_info {
        content.apply_personal_info(patch);
    }
    if let Some(summary) = parsed.summary {
        content.summary = summary;
    }
    if let Some(skills) = parsed.skills {
        content.skills = non_blank(skills);
    }
    if let Some(certifications) = parsed.certifications {
        content.certifications = non_blank(certifications);
    }
    if let Some(education) = parsed.education {
        content.education.clear();
        for fields in education {
            content.add_education(fields);
        }
    }
    if let Some(experience) = parsed.experience {
        content.experience.clear();
        for fields in experience {
            content.add_experience(fields);
        }
    }
    if let Some(projects) = parsed.projects {
        content.projects.clear();
        for fields in projects {
            content.add_project(fields);
        }
    }

    info!(
        "Merged parsed resume: {} education, {} experience, {} projects",
        content.education.len(),
        content.experience.len(),
        content.projects.len()
    );
    next
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) struct FixedParser(pub ParsedResume);

    #[async_trait]
    impl ResumeParser for FixedParser {
        async fn parse_pdf(&self, _: &str, _: Bytes) -> Result<ParsedResume, ServiceError> {
            Ok(self.0.clone())
        }
    }

    fn parsed() -> ParsedResume {
        serde_json::from_value(json!({
            "personalInfo": {"name": "Grace Hopper", "email": "grace@navy.mil"},
            "skills": ["COBOL", "  ", "Compilers"],
            "experience": [
                {"id": "remote-1", "title": "Rear Admiral", "company": "US Navy", "duration": "1943-1986"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_merge_replaces_present_fields_only() {
        let mut doc = ResumeDocument::default();
        doc.content.summary = "Keep me".into();
        doc.content.personal_info.phone = "555".into();
        doc.content.personal_info.photo = Some("data:image/jpeg;base64,AA==".into());

        let merged = merge_parsed(&doc, parsed());
        let info = &merged.content.personal_info;
        assert_eq!(info.name, "Grace Hopper");
        assert_eq!(info.phone, "555");
        assert!(info.photo.is_some());
        assert_eq!(merged.content.summary, "Keep me");
        assert_eq!(merged.content.skills, vec!["COBOL", "Compilers"]);
    }

    #[test]
    fn test_merge_assigns_fresh_entry_ids() {
        let merged = merge_parsed(&ResumeDocument::default(), parsed());
        assert_eq!(merged.content.experience.len(), 1);
        let entry = &merged.content.experience[0];
        assert_ne!(entry.id, "remote-1");
        assert!(!entry.id.is_empty());
        assert_eq!(entry.company, "US Navy");
    }

    #[test]
    fn test_check_upload_rejects_non_pdf_and_oversize() {
        assert!(matches!(
            check_upload("image/png", 10),
            Err(IntegrationError::NotPdf(_))
        ));
        assert!(matches!(
            check_upload(PDF_CONTENT_TYPE, MAX_PDF_BYTES + 1),
            Err(IntegrationError::TooLarge { .. })
        ));
        assert!(check_upload("Application/PDF", 10).is_ok());
    }

    #[tokio::test]
    async fn test_import_pdf_checks_type_before_calling_parser() {
        let parser = FixedParser(parsed());
        let err = import_pdf(&parser, "cv.docx", "application/msword", Bytes::from_static(b"PK"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::NotPdf(_)));

        let ok = import_pdf(&parser, "cv.pdf", PDF_CONTENT_TYPE, Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert_eq!(ok.skills.map(|s| s.len()), Some(3));
    }
}
