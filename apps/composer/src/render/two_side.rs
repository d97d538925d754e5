//! TwoSide template: a colored sidebar (photo, name, contacts, skills) next to a body.
//!
//! The body walks the same section order as Classic. Skills are pinned to the sidebar,
//! so the body skips every section whose kind is pinned; otherwise skills would appear
//! twice.

use serde::Serialize;

use crate::models::section::SectionKind;
use crate::models::ResumeDocument;
use crate::render::color::AccentColor;
use crate::render::{render_section, render_sections, SectionNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub name: String,
    pub contacts: Vec<String>,
    pub photo: Option<String>,
    pub skills: Option<SectionNode>,
    pub accent: AccentColor,
    pub text_color: AccentColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoSideLayout {
    pub sidebar: Sidebar,
    pub body: Vec<SectionNode>,
}

/// Kinds rendered in the sidebar instead of the body.
pub fn pinned_to_sidebar(kind: SectionKind) -> bool {
    matches!(kind, SectionKind::Skills)
}

pub fn render(doc: &ResumeDocument) -> TwoSideLayout {
    let info = &doc.content.personal_info;

    // The sidebar honours the skills slot's enabled flag like any other section.
    let skills = doc
        .sections
        .find_kind(SectionKind::Skills)
        .and_then(|section| render_section(section, &doc.content, &doc.custom_sections));

    let sidebar = Sidebar {
        name: info.name.trim().to_string(),
        contacts: info.contacts(),
        photo: info.photo.clone(),
        skills,
        accent: doc.accent_color.clone(),
        text_color: doc.accent_color.contrast_text(),
    };

    let body = render_sections(
        doc.sections.iter().filter(|s| !pinned_to_sidebar(s.kind)),
        &doc.content,
        &doc.custom_sections,
    );

    TwoSideLayout { sidebar, body }
}
