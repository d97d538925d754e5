//! Pure transitions over [`ResumeDocument`].
//!
//! Each function takes the current document by reference and returns the next one. Work
//! happens on a clone, so an `Err` means the caller still holds the untouched original.

use crate::editor::content::{
    set_template, EducationFields, ExperienceFields, PersonalInfoPatch, ProjectFields,
};
use crate::editor::custom;
use crate::editor::error::EditError;
use crate::models::document::TemplateKind;
use crate::models::section::CustomKind;
use crate::models::ResumeDocument;

impl ResumeDocument {
    /// Runs `edit` against a copy and returns the copy with the edit's output.
    pub fn edit<R>(
        &self,
        edit: impl FnOnce(&mut ResumeDocument) -> Result<R, EditError>,
    ) -> Result<(ResumeDocument, R), EditError> {
        let mut next = self.clone();
        let out = edit(&mut next)?;
        Ok((next, out))
    }

    fn infallible(&self, edit: impl FnOnce(&mut ResumeDocument)) -> ResumeDocument {
        let mut next = self.clone();
        edit(&mut next);
        next
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section order
// ────────────────────────────────────────────────────────────────────────────

pub fn move_up(doc: &ResumeDocument, index: usize) -> ResumeDocument {
    doc.infallible(|d| d.sections.move_up(index))
}

pub fn move_down(doc: &ResumeDocument, index: usize) -> ResumeDocument {
    doc.infallible(|d| d.sections.move_down(index))
}

pub fn toggle(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    doc.infallible(|d| d.sections.toggle(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Custom sections
// ────────────────────────────────────────────────────────────────────────────

pub fn create_custom_section(
    doc: &ResumeDocument,
    heading: &str,
    kind: CustomKind,
) -> Result<(ResumeDocument, String), EditError> {
    doc.edit(|d| custom::create(d, heading, kind))
}

pub fn remove_custom_section(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    doc.infallible(|d| custom::remove(d, id))
}

pub fn set_custom_text(doc: &ResumeDocument, id: &str, text: &str) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| custom::set_text(d, id, text)).map(|(d, _)| d)
}

pub fn add_custom_tag(doc: &ResumeDocument, id: &str, tag: &str) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| custom::add_tag(d, id, tag)).map(|(d, _)| d)
}

pub fn remove_custom_tag(
    doc: &ResumeDocument,
    id: &str,
    index: usize,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| custom::remove_tag(d, id, index)).map(|(d, _)| d)
}

pub fn add_custom_item(doc: &ResumeDocument, id: &str) -> Result<(ResumeDocument, String), EditError> {
    doc.edit(|d| custom::add_item(d, id))
}

pub fn update_custom_item(
    doc: &ResumeDocument,
    id: &str,
    item_id: &str,
    text: &str,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| custom::update_item(d, id, item_id, text))
        .map(|(d, _)| d)
}

pub fn remove_custom_item(
    doc: &ResumeDocument,
    id: &str,
    item_id: &str,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| custom::remove_item(d, id, item_id))
        .map(|(d, _)| d)
}

// ────────────────────────────────────────────────────────────────────────────
// Content store
// ────────────────────────────────────────────────────────────────────────────

pub fn update_personal_info(doc: &ResumeDocument, patch: PersonalInfoPatch) -> ResumeDocument {
    doc.infallible(|d| d.content.apply_personal_info(patch))
}

pub fn set_summary(doc: &ResumeDocument, summary: &str) -> ResumeDocument {
    doc.infallible(|d| d.content.summary = summary.to_string())
}

pub fn add_skill(doc: &ResumeDocument, skill: &str) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| d.content.add_skill(skill)).map(|(d, _)| d)
}

pub fn remove_skill(doc: &ResumeDocument, index: usize) -> ResumeDocument {
    doc.infallible(|d| d.content.remove_skill(index))
}

pub fn add_certification(doc: &ResumeDocument, text: &str) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| d.content.add_certification(text)).map(|(d, _)| d)
}

pub fn remove_certification(doc: &ResumeDocument, index: usize) -> ResumeDocument {
    doc.infallible(|d| d.content.remove_certification(index))
}

pub fn add_education(doc: &ResumeDocument, fields: EducationFields) -> (ResumeDocument, String) {
    let mut next = doc.clone();
    let id = next.content.add_education(fields);
    (next, id)
}

pub fn update_education(
    doc: &ResumeDocument,
    id: &str,
    fields: EducationFields,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| d.content.update_education(id, fields)).map(|(d, _)| d)
}

pub fn remove_education(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    doc.infallible(|d| d.content.remove_education(id))
}

pub fn add_experience(doc: &ResumeDocument, fields: ExperienceFields) -> (ResumeDocument, String) {
    let mut next = doc.clone();
    let id = next.content.add_experience(fields);
    (next, id)
}

pub fn update_experience(
    doc: &ResumeDocument,
    id: &str,
    fields: ExperienceFields,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| d.content.update_experience(id, fields)).map(|(d, _)| d)
}

pub fn remove_experience(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    doc.infallible(|d| d.content.remove_experience(id))
}

pub fn add_project(doc: &ResumeDocument, fields: ProjectFields) -> (ResumeDocument, String) {
    let mut next = doc.clone();
    let id = next.content.add_project(fields);
    (next, id)
}

pub fn update_project(
    doc: &ResumeDocument,
    id: &str,
    fields: ProjectFields,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| d.content.update_project(id, fields)).map(|(d, _)| d)
}

pub fn remove_project(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    doc.infallible(|d| d.content.remove_project(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Template and photo
// ────────────────────────────────────────────────────────────────────────────

pub fn select_template(
    doc: &ResumeDocument,
    template: TemplateKind,
    accent: Option<&str>,
) -> Result<ResumeDocument, EditError> {
    doc.edit(|d| set_template(d, template, accent)).map(|(d, _)| d)
}

pub fn set_photo(doc: &ResumeDocument, data_url: String) -> ResumeDocument {
    doc.infallible(|d| d.content.personal_info.photo = Some(data_url))
}

pub fn remove_photo(doc: &ResumeDocument) -> ResumeDocument {
    doc.infallible(|d| d.content.personal_info.photo = None)
}
