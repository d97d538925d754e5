use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::section::CustomKind;

/// One entry of a list-shaped custom section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Content of a custom section, one variant per declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomContent {
    Paragraph(String),
    Tags(Vec<String>),
    List(Vec<ListItem>),
}

impl CustomContent {
    /// Empty content for a freshly created section of the given shape.
    pub fn empty(kind: CustomKind) -> Self {
        match kind {
            CustomKind::Paragraph => CustomContent::Paragraph(String::new()),
            CustomKind::Tags => CustomContent::Tags(Vec::new()),
            CustomKind::List => CustomContent::List(Vec::new()),
        }
    }

    pub fn kind(&self) -> CustomKind {
        match self {
            CustomContent::Paragraph(_) => CustomKind::Paragraph,
            CustomContent::Tags(_) => CustomKind::Tags,
            CustomContent::List(_) => CustomKind::List,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCustomSection", into = "RawCustomSection")]
pub struct CustomSection {
    pub id: String,
    pub heading: String,
    pub content: CustomContent,
}

impl CustomSection {
    pub fn kind(&self) -> CustomKind {
        self.content.kind()
    }
}

/// Wire shape `{id, heading, type, content}`, where `content` depends on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCustomSection {
    id: String,
    #[serde(default)]
    heading: String,
    #[serde(rename = "type")]
    kind: CustomKind,
    #[serde(default)]
    content: Value,
}

impl TryFrom<RawCustomSection> for CustomSection {
    type Error = String;

    fn try_from(raw: RawCustomSection) -> Result<Self, Self::Error> {
        let shape_error = |e: serde_json::Error| {
            format!(
                "custom section '{}' has content that is not {}: {e}",
                raw.id,
                raw.kind.as_str()
            )
        };
        let content = match (raw.kind, raw.content) {
            (kind, Value::Null) => CustomContent::empty(kind),
            (CustomKind::Paragraph, value) => {
                CustomContent::Paragraph(serde_json::from_value(value).map_err(shape_error)?)
            }
            (CustomKind::Tags, value) => {
                CustomContent::Tags(serde_json::from_value(value).map_err(shape_error)?)
            }
            (CustomKind::List, value) => {
                CustomContent::List(serde_json::from_value(value).map_err(shape_error)?)
            }
        };
        Ok(CustomSection {
            id: raw.id,
            heading: raw.heading,
            content,
        })
    }
}

impl From<CustomSection> for RawCustomSection {
    fn from(section: CustomSection) -> Self {
        let kind = section.kind();
        let content = match section.content {
            CustomContent::Paragraph(text) => Value::String(text),
            CustomContent::Tags(tags) => Value::Array(tags.into_iter().map(Value::String).collect()),
            CustomContent::List(items) => serde_json::to_value(items).unwrap_or(Value::Null),
        };
        RawCustomSection {
            id: section.id,
            heading: section.heading,
            kind,
            content,
        }
    }
}

/// User-authored sections in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomSectionStore(Vec<CustomSection>);

impl CustomSectionStore {
    pub fn new(sections: Vec<CustomSection>) -> Self {
        Self(sections)
    }

    pub fn get(&self, id: &str) -> Option<&CustomSection> {
        self.0.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CustomSection> {
        self.0.iter_mut().find(|s| s.id == id)
    }

    pub fn push(&mut self, section: CustomSection) {
        self.0.push(section);
    }

    /// Removes the section with `id`, returning whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s.id != id);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomSection> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_section_round_trips_through_wire_shape() {
        let section = CustomSection {
            id: "c1".into(),
            heading: "Volunteering".into(),
            content: CustomContent::List(vec![ListItem {
                id: "i1".into(),
                text: "Food bank".into(),
            }]),
        };
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "heading": "Volunteering",
                "type": "list",
                "content": [{"id": "i1", "text": "Food bank"}]
            })
        );
        let back: CustomSection = serde_json::from_value(value).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_paragraph_content_must_be_a_string() {
        let result: Result<CustomSection, _> = serde_json::from_value(
            json!({"id": "c1", "heading": "About", "type": "paragraph", "content": ["a"]}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_content_becomes_empty_shape() {
        let section: CustomSection =
            serde_json::from_value(json!({"id": "c1", "heading": "Langs", "type": "tags"}))
                .unwrap();
        assert_eq!(section.content, CustomContent::Tags(vec![]));
    }

    #[test]
    fn test_store_remove_reports_missing_id() {
        let mut store = CustomSectionStore::default();
        store.push(CustomSection {
            id: "c1".into(),
            heading: "A".into(),
            content: CustomContent::empty(CustomKind::Paragraph),
        });
        assert!(!store.remove("nope"));
        assert!(store.remove("c1"));
        assert!(store.is_empty());
    }
}
