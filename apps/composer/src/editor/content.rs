//! Content Store edits: identity, summary, the string collections, and the three
//! id-addressed entry collections.

use serde::Deserialize;

use crate::editor::error::EditError;
use crate::editor::new_id;
use crate::models::content::{ContentStore, Education, Experience, Project};
use crate::models::document::TemplateKind;
use crate::models::ResumeDocument;
use crate::render::color::AccentColor;

/// Fields of `PersonalInfo` the user edits directly. Absent fields are left alone and
/// the photo is never touched here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EducationFields {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceFields {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub technologies: String,
}

impl EducationFields {
    fn into_entry(self, id: String) -> Education {
        Education {
            id,
            institution: self.institution,
            degree: self.degree,
            year: self.year,
        }
    }
}

impl ExperienceFields {
    fn into_entry(self, id: String) -> Experience {
        Experience {
            id,
            title: self.title,
            company: self.company,
            duration: self.duration,
            description: self.description,
        }
    }
}

impl ProjectFields {
    fn into_entry(self, id: String) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            technologies: self.technologies,
        }
    }
}

impl ContentStore {
    pub fn apply_personal_info(&mut self, patch: PersonalInfoPatch) {
        let info = &mut self.personal_info;
        if let Some(name) = patch.name {
            info.name = name;
        }
        if let Some(email) = patch.email {
            info.email = email;
        }
        if let Some(phone) = patch.phone {
            info.phone = phone;
        }
        if let Some(linkedin) = patch.linkedin {
            info.linkedin = linkedin;
        }
    }

    pub fn add_skill(&mut self, skill: &str) -> Result<(), EditError> {
        push_non_blank(&mut self.skills, skill, EditError::BlankSkill)
    }

    pub fn remove_skill(&mut self, index: usize) {
        remove_index(&mut self.skills, index);
    }

    pub fn add_certification(&mut self, certification: &str) -> Result<(), EditError> {
        push_non_blank(
            &mut self.certifications,
            certification,
            EditError::BlankCertification,
        )
    }

    pub fn remove_certification(&mut self, index: usize) {
        remove_index(&mut self.certifications, index);
    }

    pub fn add_education(&mut self, fields: EducationFields) -> String {
        let id = new_id();
        self.education.push(fields.into_entry(id.clone()));
        id
    }

    pub fn update_education(&mut self, id: &str, fields: EducationFields) -> Result<(), EditError> {
        let entry = find_entry(&mut self.education, id, |e| &e.id, "Education")?;
        *entry = fields.into_entry(id.to_string());
        Ok(())
    }

    pub fn remove_education(&mut self, id: &str) {
        self.education.retain(|e| e.id != id);
    }

    pub fn add_experience(&mut self, fields: ExperienceFields) -> String {
        let id = new_id();
        self.experience.push(fields.into_entry(id.clone()));
        id
    }

    pub fn update_experience(&mut self, id: &str, fields: ExperienceFields) -> Result<(), EditError> {
        let entry = find_entry(&mut self.experience, id, |e| &e.id, "Experience")?;
        *entry = fields.into_entry(id.to_string());
        Ok(())
    }

    pub fn remove_experience(&mut self, id: &str) {
        self.experience.retain(|e| e.id != id);
    }

    pub fn add_project(&mut self, fields: ProjectFields) -> String {
        let id = new_id();
        self.projects.push(fields.into_entry(id.clone()));
        id
    }

    pub fn update_project(&mut self, id: &str, fields: ProjectFields) -> Result<(), EditError> {
        let entry = find_entry(&mut self.projects, id, |p| &p.id, "Project")?;
        *entry = fields.into_entry(id.to_string());
        Ok(())
    }

    pub fn remove_project(&mut self, id: &str) {
        self.projects.retain(|p| p.id != id);
    }
}

/// Switches layout and, when given, the accent color.
pub fn set_template(
    doc: &mut ResumeDocument,
    template: TemplateKind,
    accent: Option<&str>,
) -> Result<(), EditError> {
    if let Some(raw) = accent {
        doc.accent_color =
            AccentColor::parse(raw).ok_or_else(|| EditError::InvalidAccentColor(raw.to_string()))?;
    }
    doc.template = template;
    Ok(())
}

fn push_non_blank(list: &mut Vec<String>, value: &str, blank: EditError) -> Result<(), EditError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(blank);
    }
    list.push(value.to_string());
    Ok(())
}

fn remove_index<T>(list: &mut Vec<T>, index: usize) {
    if index < list.len() {
        list.remove(index);
    }
}

fn find_entry<'a, T>(
    list: &'a mut [T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
    collection: &'static str,
) -> Result<&'a mut T, EditError> {
    list.iter_mut()
        .find(|e| id_of(e) == id)
        .ok_or_else(|| EditError::UnknownEntry {
            collection,
            id: id.to_string(),
        })
}
