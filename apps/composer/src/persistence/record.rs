//! The persisted JSON record and its mapping to and from [`ResumeDocument`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::editor::order::SectionOrder;
use crate::models::content::{ContentStore, Education, Experience, PersonalInfo, Project};
use crate::models::custom::{CustomSection, CustomSectionStore};
use crate::models::document::TemplateKind;
use crate::models::section::{Section, SectionKind};
use crate::models::ResumeDocument;
use crate::render::color::AccentColor;

/// Wire shape stored by the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(default)]
    pub resume_name: String,
    /// Present only when updating an existing résumé.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
    #[serde(default)]
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<Section>>,
    #[serde(default = "dynamic_by_default")]
    pub is_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

fn dynamic_by_default() -> bool {
    true
}

impl ResumeRecord {
    pub fn from_document(doc: &ResumeDocument, resume_name: &str, resume_id: Option<&str>) -> Self {
        let content = &doc.content;
        let accent_color = match doc.template {
            TemplateKind::TwoSide => Some(doc.accent_color.as_str().to_string()),
            TemplateKind::Classic => None,
        };
        Self {
            resume_name: resume_name.trim().to_string(),
            resume_id: resume_id.map(String::from),
            personal_info: content.personal_info.clone(),
            summary: content.summary.clone(),
            education: content.education.clone(),
            experience: content.experience.clone(),
            projects: content.projects.clone(),
            skills: content.skills.clone(),
            certifications: content.certifications.clone(),
            custom_sections: doc.custom_sections.iter().cloned().collect(),
            template: doc.template.template_id().to_string(),
            section_order: Some(doc.sections.iter().cloned().collect()),
            is_dynamic: true,
            resume_format: Some(doc.template.format_str().to_string()),
            accent_color,
        }
    }

    /// Rebuilds a document. `template_hint` is the service-level template name, used when
    /// the record itself does not say which format it is.
    pub fn into_document(self, template_hint: Option<&str>) -> ResumeDocument {
        let template = self
            .resume_format
            .as_deref()
            .and_then(TemplateKind::parse)
            .or_else(|| TemplateKind::parse(&self.template))
            .or_else(|| template_hint.and_then(TemplateKind::parse))
            .unwrap_or_default();

        let accent_color = match self.accent_color.as_deref() {
            Some(raw) => AccentColor::parse(raw).unwrap_or_else(|| {
                warn!("Ignoring invalid stored accent color '{raw}'");
                AccentColor::default()
            }),
            None => AccentColor::default(),
        };

        let custom_sections = CustomSectionStore::new(self.custom_sections);
        let sections = match self.section_order {
            Some(order) => reconcile_order(order, &custom_sections),
            None => default_order_with(&custom_sections),
        };

        ResumeDocument {
            content: ContentStore {
                personal_info: self.personal_info,
                summary: self.summary,
                skills: self.skills,
                education: self.education,
                experience: self.experience,
                projects: self.projects,
                certifications: self.certifications,
            },
            custom_sections,
            sections,
            template,
            accent_color,
        }
    }
}

/// Restores the order invariant against the loaded custom sections: unique ids, every
/// custom slot backed by a custom section of the same shape, every custom section slotted.
pub fn reconcile_order(order: Vec<Section>, custom: &CustomSectionStore) -> SectionOrder {
    let mut seen = HashSet::new();
    let mut sections = Vec::with_capacity(order.len());

    for mut section in order {
        if !seen.insert(section.id.clone()) {
            warn!("Dropping duplicate section '{}' from stored order", section.id);
            continue;
        }
        if let SectionKind::Custom(kind) = section.kind {
            match custom.get(&section.id) {
                None => {
                    warn!(
                        "Dropping section '{}': no matching custom section",
                        section.id
                    );
                    continue;
                }
                Some(backing) if backing.kind() != kind => {
                    warn!(
                        "Section '{}' declared {} but holds {}; using the content shape",
                        section.id,
                        kind.as_str(),
                        backing.kind().as_str()
                    );
                    section.kind = SectionKind::Custom(backing.kind());
                }
                Some(_) => {}
            }
        }
        sections.push(section);
    }

    let mut order = SectionOrder::new(sections);
    append_missing_custom(&mut order, custom);
    order
}

fn default_order_with(custom: &CustomSectionStore) -> SectionOrder {
    let mut order = SectionOrder::default();
    append_missing_custom(&mut order, custom);
    order
}

fn append_missing_custom(order: &mut SectionOrder, custom: &CustomSectionStore) {
    for section in custom.iter() {
        if !order.contains(&section.id) {
            warn!("Custom section '{}' missing from order; appending", section.id);
            order.push(Section::custom(
                section.id.clone(),
                section.heading.clone(),
                section.kind(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::transitions::{
        add_custom_tag, create_custom_section, move_down, select_template, toggle,
    };
    use crate::models::section::CustomKind;
    use serde_json::json;

    fn sample() -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.content.personal_info.name = "Ada Lovelace".into();
        doc.content.skills = vec!["Go".into(), "Rust".into()];
        doc.content.summary = "Engineer".into();
        let (doc, id) = create_custom_section(&doc, "Languages", CustomKind::Tags).unwrap();
        let doc = add_custom_tag(&doc, &id, "English").unwrap();
        let doc = toggle(&move_down(&doc, 0), "education");
        select_template(&doc, TemplateKind::TwoSide, Some("#0f766e")).unwrap()
    }

    #[test]
    fn test_record_shape_has_expected_keys() {
        let value = serde_json::to_value(ResumeRecord::from_document(&sample(), "CV", None)).unwrap();
        for key in [
            "resumeName",
            "personalInfo",
            "summary",
            "education",
            "experience",
            "projects",
            "skills",
            "certifications",
            "customSections",
            "template",
            "sectionOrder",
            "isDynamic",
            "resumeFormat",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("resumeId").is_none());
        assert_eq!(value["isDynamic"], true);
        assert_eq!(value["resumeFormat"], "two-side");
        assert_eq!(value["template"], "dynamic-two-side");
        assert_eq!(value["accentColor"], "#0f766e");
    }

    #[test]
    fn test_resume_id_included_when_editing() {
        let record = ResumeRecord::from_document(&sample(), "CV", Some("r-9"));
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["resumeId"], "r-9");
    }

    #[test]
    fn test_classic_record_omits_accent() {
        let record = ResumeRecord::from_document(&ResumeDocument::default(), "CV", None);
        assert!(record.accent_color.is_none());
        assert_eq!(record.resume_format.as_deref(), Some("classic"));
    }

    #[test]
    fn test_document_survives_record_round_trip() {
        let doc = sample();
        let json = serde_json::to_string(&ResumeRecord::from_document(&doc, "CV", None)).unwrap();
        let back: ResumeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_document(None), doc);
    }

    #[test]
    fn test_missing_order_gets_default_plus_custom_entries() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "resumeName": "Old",
            "customSections": [{"id": "c1", "heading": "Awards", "type": "list", "content": []}]
        }))
        .unwrap();
        let doc = record.into_document(None);
        assert_eq!(doc.sections.len(), 7);
        assert_eq!(
            doc.sections.get("c1").unwrap().kind,
            SectionKind::Custom(CustomKind::List)
        );
    }

    #[test]
    fn test_reconcile_drops_orphans_and_duplicates() {
        let custom = CustomSectionStore::default();
        let order = vec![
            Section::built_in(SectionKind::Skills),
            Section::built_in(SectionKind::Skills),
            Section::custom("ghost".into(), "Ghost".into(), CustomKind::Tags),
        ];
        let order = reconcile_order(order, &custom);
        let ids: Vec<&str> = order.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["skills"]);
    }

    #[test]
    fn test_reconcile_fixes_declared_shape() {
        let mut custom = CustomSectionStore::default();
        custom.push(CustomSection {
            id: "c1".into(),
            heading: "Notes".into(),
            content: crate::models::custom::CustomContent::Paragraph("hi".into()),
        });
        let order = reconcile_order(
            vec![Section::custom("c1".into(), "Notes".into(), CustomKind::List)],
            &custom,
        );
        assert_eq!(
            order.get("c1").unwrap().kind,
            SectionKind::Custom(CustomKind::Paragraph)
        );
    }

    #[test]
    fn test_template_falls_back_to_hint() {
        let record: ResumeRecord = serde_json::from_value(json!({"resumeName": "X"})).unwrap();
        assert_eq!(
            record.into_document(Some("two-side")).template,
            TemplateKind::TwoSide
        );
    }

    #[test]
    fn test_invalid_stored_accent_falls_back_to_default() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "resumeName": "X",
            "resumeFormat": "two-side",
            "accentColor": "blue"
        }))
        .unwrap();
        assert_eq!(record.into_document(None).accent_color, AccentColor::default());
    }
}
