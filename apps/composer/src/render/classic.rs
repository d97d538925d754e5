//! Classic template: one column, header first, then sections in document order.

use serde::Serialize;

use crate::models::ResumeDocument;
use crate::render::{render_sections, Header, SectionNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassicLayout {
    pub header: Header,
    pub body: Vec<SectionNode>,
}

pub fn render(doc: &ResumeDocument) -> ClassicLayout {
    ClassicLayout {
        header: Header::from_content(&doc.content),
        body: render_sections(doc.sections.iter(), &doc.content, &doc.custom_sections),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::SectionKind;
    use crate::render::NodeBody;

    #[test]
    fn test_skills_render_joined_text() {
        let mut doc = ResumeDocument::default();
        doc.content.skills = vec!["Go".into(), "Rust".into()];
        let layout = render(&doc);

        let skills: Vec<_> = layout
            .body
            .iter()
            .filter(|n| n.kind == SectionKind::Skills)
            .collect();
        assert_eq!(skills.len(), 1);
        match &skills[0].body {
            NodeBody::Inline { joined, .. } => assert_eq!(joined, "Go, Rust"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_header_is_outside_the_ordered_body() {
        let mut doc = ResumeDocument::default();
        doc.content.personal_info.name = " Ada Lovelace ".into();
        doc.content.personal_info.email = "ada@example.com".into();
        let layout = render(&doc);
        assert_eq!(layout.header.name, "Ada Lovelace");
        assert_eq!(layout.header.contacts, vec!["ada@example.com"]);
        assert!(layout.body.is_empty());
    }

    #[test]
    fn test_classic_ignores_photo() {
        let mut doc = ResumeDocument::default();
        doc.content.personal_info.photo = Some("data:image/jpeg;base64,AA".into());
        let value = serde_json::to_value(render(&doc)).unwrap();
        assert!(value.get("photo").is_none());
        assert!(value["header"].get("photo").is_none());
    }
}
