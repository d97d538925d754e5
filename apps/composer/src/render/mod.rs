//! Renderer: maps the document onto a render tree the presentation client draws and
//! the exporter lays out.
//!
//! Both layouts share [`render_section`], an exhaustive match over [`SectionKind`].
//! The suppression rule lives there: a disabled section is skipped before its content is
//! read, and an enabled section whose backing content is empty yields no node. Text that is
//! only whitespace counts as empty, for the summary and custom paragraphs alike.

pub mod classic;
pub mod color;
pub mod handlers;
pub mod two_side;

use serde::{Serialize, Serializer};

use crate::models::content::ContentStore;
use crate::models::custom::{CustomContent, CustomSectionStore};
use crate::models::document::TemplateKind;
use crate::models::section::{Section, SectionKind};
use crate::models::ResumeDocument;

pub use classic::ClassicLayout;
pub use two_side::TwoSideLayout;

// ────────────────────────────────────────────────────────────────────────────
// Render tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout")]
pub enum RenderTree {
    #[serde(rename = "classic")]
    Classic(ClassicLayout),
    #[serde(rename = "two-side")]
    TwoSide(TwoSideLayout),
}

impl RenderTree {
    /// Name of the person the document belongs to.
    pub fn person_name(&self) -> &str {
        match self {
            RenderTree::Classic(layout) => &layout.header.name,
            RenderTree::TwoSide(layout) => &layout.sidebar.name,
        }
    }

    /// Every section node in reading order, sidebar first for TwoSide.
    pub fn section_nodes(&self) -> Vec<&SectionNode> {
        match self {
            RenderTree::Classic(layout) => layout.body.iter().collect(),
            RenderTree::TwoSide(layout) => layout
                .sidebar
                .skills
                .iter()
                .chain(layout.body.iter())
                .collect(),
        }
    }
}

/// Name and contact block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub name: String,
    pub contacts: Vec<String>,
}

impl Header {
    pub fn from_content(content: &ContentStore) -> Self {
        Self {
            name: content.personal_info.name.trim().to_string(),
            contacts: content.personal_info.contacts(),
        }
    }
}

/// One rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    pub section_id: String,
    #[serde(rename = "type", serialize_with = "serialize_kind")]
    pub kind: SectionKind,
    pub heading: String,
    pub body: NodeBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum NodeBody {
    /// Free text (profile summary, paragraph custom sections).
    Text { text: String },
    /// Short items shown on one line, e.g. skills as `"Go, Rust"`.
    Inline { items: Vec<String>, joined: String },
    /// One item per line.
    Bullets { items: Vec<String> },
    /// Education, experience and project entries.
    Entries { entries: Vec<EntryNode> },
}

impl NodeBody {
    fn inline(items: &[String]) -> Self {
        NodeBody::Inline {
            items: items.to_vec(),
            joined: items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryNode {
    pub title: String,
    pub subtitle: String,
    pub meta: String,
    pub details: Vec<String>,
}

fn serialize_kind<S: Serializer>(kind: &SectionKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.type_str())
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

/// Renders the document with its selected template.
pub fn render(doc: &ResumeDocument) -> RenderTree {
    render_as(doc, doc.template)
}

pub fn render_as(doc: &ResumeDocument, template: TemplateKind) -> RenderTree {
    match template {
        TemplateKind::Classic => RenderTree::Classic(classic::render(doc)),
        TemplateKind::TwoSide => RenderTree::TwoSide(two_side::render(doc)),
    }
}

/// Renders the ordered sections, dropping disabled and empty ones.
pub fn render_sections<'a>(
    sections: impl IntoIterator<Item = &'a Section>,
    content: &ContentStore,
    custom: &CustomSectionStore,
) -> Vec<SectionNode> {
    sections
        .into_iter()
        .filter_map(|section| render_section(section, content, custom))
        .collect()
}

/// Renders one section, or `None` when it is disabled or its content is empty.
pub fn render_section(
    section: &Section,
    content: &ContentStore,
    custom: &CustomSectionStore,
) -> Option<SectionNode> {
    if !section.enabled {
        return None;
    }

    let (heading, body) = match section.kind {
        SectionKind::Profile => {
            let summary = content.summary.trim();
            if summary.is_empty() {
                return None;
            }
            (
                section.name.clone(),
                NodeBody::Text {
                    text: summary.to_string(),
                },
            )
        }
        SectionKind::Skills => {
            if content.skills.is_empty() {
                return None;
            }
            (section.name.clone(), NodeBody::inline(&content.skills))
        }
        SectionKind::Education => {
            if content.education.is_empty() {
                return None;
            }
            let entries = content
                .education
                .iter()
                .map(|e| EntryNode {
                    title: e.degree.clone(),
                    subtitle: e.institution.clone(),
                    meta: e.year.clone(),
                    details: vec![],
                })
                .collect();
            (section.name.clone(), NodeBody::Entries { entries })
        }
        SectionKind::Experience => {
            if content.experience.is_empty() {
                return None;
            }
            let entries = content
                .experience
                .iter()
                .map(|e| EntryNode {
                    title: e.title.clone(),
                    subtitle: e.company.clone(),
                    meta: e.duration.clone(),
                    details: e.description_lines(),
                })
                .collect();
            (section.name.clone(), NodeBody::Entries { entries })
        }
        SectionKind::Projects => {
            if content.projects.is_empty() {
                return None;
            }
            let entries = content
                .projects
                .iter()
                .map(|p| EntryNode {
                    title: p.name.clone(),
                    subtitle: p.technologies.clone(),
                    meta: String::new(),
                    details: non_blank_lines(&p.description),
                })
                .collect();
            (section.name.clone(), NodeBody::Entries { entries })
        }
        SectionKind::Certifications => {
            if content.certifications.is_empty() {
                return None;
            }
            (
                section.name.clone(),
                NodeBody::Bullets {
                    items: content.certifications.clone(),
                },
            )
        }
        SectionKind::Custom(_) => {
            let custom_section = custom.get(&section.id)?;
            let body = render_custom(&custom_section.content)?;
            (custom_section.heading.clone(), body)
        }
    };

    Some(SectionNode {
        section_id: section.id.clone(),
        kind: section.kind,
        heading,
        body,
    })
}

/// Second-level dispatch over the custom content shape. A whitespace-only paragraph is
/// suppressed like a whitespace-only summary.
fn render_custom(content: &CustomContent) -> Option<NodeBody> {
    match content {
        CustomContent::Paragraph(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(NodeBody::Text {
                text: text.to_string(),
            })
        }
        CustomContent::Tags(tags) => {
            if tags.is_empty() {
                return None;
            }
            Some(NodeBody::inline(tags))
        }
        CustomContent::List(items) => {
            let items: Vec<String> = items
                .iter()
                .filter(|item| !item.text.trim().is_empty())
                .map(|item| item.text.clone())
                .collect();
            if items.is_empty() {
                return None;
            }
            Some(NodeBody::Bullets { items })
        }
    }
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::transitions::{
        add_custom_item, create_custom_section, set_custom_text, toggle, update_custom_item,
    };
    use crate::models::content::{Education, Experience, Project};
    use crate::models::section::CustomKind;

    fn empty() -> ResumeDocument {
        ResumeDocument::default()
    }

    fn nodes(doc: &ResumeDocument) -> Vec<SectionNode> {
        render_sections(doc.sections.iter(), &doc.content, &doc.custom_sections)
    }

    fn fill(doc: &mut ResumeDocument, kind: SectionKind) {
        let c = &mut doc.content;
        match kind {
            SectionKind::Profile => c.summary = "Systems engineer".into(),
            SectionKind::Skills => c.skills = vec!["Go".into()],
            SectionKind::Education => c.education = vec![Education::default()],
            SectionKind::Experience => c.experience = vec![Experience::default()],
            SectionKind::Projects => c.projects = vec![Project::default()],
            SectionKind::Certifications => c.certifications = vec!["CKA".into()],
            SectionKind::Custom(_) => unreachable!(),
        }
    }

    #[test]
    fn test_empty_document_renders_no_sections() {
        assert!(nodes(&empty()).is_empty());
    }

    #[test]
    fn test_each_built_in_renders_exactly_one_node_when_filled() {
        for kind in SectionKind::BUILT_IN {
            let mut doc = empty();
            fill(&mut doc, kind);
            let rendered = nodes(&doc);
            assert_eq!(rendered.len(), 1, "{kind:?}");
            assert_eq!(rendered[0].kind, kind);
        }
    }

    #[test]
    fn test_disabled_section_is_skipped_even_when_filled() {
        let mut doc = empty();
        fill(&mut doc, SectionKind::Certifications);
        let doc = toggle(&doc, "certifications");
        assert!(nodes(&doc).is_empty());
    }

    #[test]
    fn test_whitespace_summary_is_suppressed() {
        let mut doc = empty();
        doc.content.summary = "   ".into();
        assert!(nodes(&doc).is_empty());
    }

    #[test]
    fn test_experience_description_becomes_sub_items() {
        let mut doc = empty();
        doc.content.experience = vec![Experience {
            title: "Engineer".into(),
            description: "Built API\n\n  Mentored 3 juniors ".into(),
            ..Default::default()
        }];
        let rendered = nodes(&doc);
        match &rendered[0].body {
            NodeBody::Entries { entries } => {
                assert_eq!(entries[0].details, vec!["Built API", "Mentored 3 juniors"]);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_render_follows_section_order() {
        let mut doc = empty();
        fill(&mut doc, SectionKind::Profile);
        fill(&mut doc, SectionKind::Certifications);
        for index in (1..=5).rev() {
            doc.sections.move_up(index);
        }
        let kinds: Vec<SectionKind> = nodes(&doc).iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Certifications, SectionKind::Profile]);
    }

    #[test]
    fn test_empty_custom_sections_are_suppressed() {
        let doc = empty();
        let (doc, _) = create_custom_section(&doc, "About", CustomKind::Paragraph).unwrap();
        let (doc, _) = create_custom_section(&doc, "Langs", CustomKind::Tags).unwrap();
        let (doc, list) = create_custom_section(&doc, "Extras", CustomKind::List).unwrap();
        let (doc, _) = add_custom_item(&doc, &list).unwrap();
        assert!(nodes(&doc).is_empty());
    }

    #[test]
    fn test_list_filters_blank_items() {
        let (doc, list) = create_custom_section(&empty(), "Extras", CustomKind::List).unwrap();
        let (doc, blank) = add_custom_item(&doc, &list).unwrap();
        let (doc, filled) = add_custom_item(&doc, &list).unwrap();
        let doc = update_custom_item(&doc, &list, &blank, "  ").unwrap();
        let doc = update_custom_item(&doc, &list, &filled, "Chess club").unwrap();
        let rendered = nodes(&doc);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].heading, "Extras");
        assert_eq!(
            rendered[0].body,
            NodeBody::Bullets {
                items: vec!["Chess club".into()]
            }
        );
    }

    #[test]
    fn test_paragraph_custom_section_renders_text() {
        let (doc, id) = create_custom_section(&empty(), "About", CustomKind::Paragraph).unwrap();
        let doc = set_custom_text(&doc, &id, "Hello").unwrap();
        let rendered = nodes(&doc);
        assert_eq!(rendered[0].section_id, id);
        assert_eq!(rendered[0].kind, SectionKind::Custom(CustomKind::Paragraph));
    }

    #[test]
    fn test_whitespace_paragraph_is_suppressed() {
        let (doc, id) = create_custom_section(&empty(), "About", CustomKind::Paragraph).unwrap();
        let doc = set_custom_text(&doc, &id, " \n\t ").unwrap();
        assert!(nodes(&doc).is_empty());
    }

    #[test]
    fn test_orphan_custom_entry_renders_nothing() {
        let mut doc = empty();
        doc.sections
            .push(Section::custom("ghost".into(), "Ghost".into(), CustomKind::Tags));
        assert!(nodes(&doc).is_empty());
    }

    #[test]
    fn test_node_serializes_type_and_shape() {
        let mut doc = empty();
        doc.content.skills = vec!["Go".into(), "Rust".into()];
        let value = serde_json::to_value(&nodes(&doc)[0]).unwrap();
        assert_eq!(value["type"], "skills");
        assert_eq!(value["body"]["shape"], "inline");
        assert_eq!(value["body"]["joined"], "Go, Rust");
    }
}
