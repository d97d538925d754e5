use serde::{Deserialize, Serialize};

/// The declared content shape of a user-authored section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomKind {
    Paragraph,
    Tags,
    List,
}

impl CustomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomKind::Paragraph => "paragraph",
            CustomKind::Tags => "tags",
            CustomKind::List => "list",
        }
    }
}

/// What a section slot renders. Built-in kinds read the content store; `Custom`
/// reads the custom section with the same id and carries its declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Profile,
    Skills,
    Education,
    Experience,
    Projects,
    Certifications,
    Custom(CustomKind),
}

impl SectionKind {
    pub const BUILT_IN: [SectionKind; 6] = [
        SectionKind::Profile,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    /// The `type` discriminator used in the persisted record.
    pub fn type_str(&self) -> &'static str {
        match self {
            SectionKind::Profile => "profile",
            SectionKind::Skills => "skills",
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Custom(_) => "custom",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            SectionKind::Profile => "Professional Summary",
            SectionKind::Skills => "Skills",
            SectionKind::Education => "Education",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Custom(_) => "Custom Section",
        }
    }
}

/// One addressable, orderable, toggleable slot of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub kind: SectionKind,
    pub enabled: bool,
}

impl Section {
    pub fn built_in(kind: SectionKind) -> Self {
        Self {
            id: kind.type_str().to_string(),
            name: kind.default_name().to_string(),
            kind,
            enabled: true,
        }
    }

    pub fn custom(id: String, name: String, kind: CustomKind) -> Self {
        Self {
            id,
            name,
            kind: SectionKind::Custom(kind),
            enabled: true,
        }
    }
}

/// Flat wire shape: `{id, name, type, enabled, customType?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_type: Option<CustomKind>,
}

fn enabled_by_default() -> bool {
    true
}

impl TryFrom<RawSection> for Section {
    type Error = String;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let kind = match raw.section_type.as_str() {
            "profile" => SectionKind::Profile,
            "skills" => SectionKind::Skills,
            "education" => SectionKind::Education,
            "experience" => SectionKind::Experience,
            "projects" => SectionKind::Projects,
            "certifications" => SectionKind::Certifications,
            "custom" => SectionKind::Custom(raw.custom_type.ok_or_else(|| {
                format!("custom section '{}' is missing customType", raw.id)
            })?),
            other => return Err(format!("unknown section type '{other}'")),
        };
        let name = if raw.name.is_empty() {
            kind.default_name().to_string()
        } else {
            raw.name
        };
        Ok(Section {
            id: raw.id,
            name,
            kind,
            enabled: raw.enabled,
        })
    }
}

impl From<Section> for RawSection {
    fn from(section: Section) -> Self {
        let custom_type = match section.kind {
            SectionKind::Custom(kind) => Some(kind),
            _ => None,
        };
        RawSection {
            id: section.id,
            name: section.name,
            section_type: section.kind.type_str().to_string(),
            enabled: section.enabled,
            custom_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_built_in_section_serializes_flat() {
        let value = serde_json::to_value(Section::built_in(SectionKind::Skills)).unwrap();
        assert_eq!(
            value,
            json!({"id": "skills", "name": "Skills", "type": "skills", "enabled": true})
        );
    }

    #[test]
    fn test_custom_section_carries_custom_type() {
        let section = Section::custom("c1".into(), "Awards".into(), CustomKind::Tags);
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["customType"], "tags");

        let back: Section = serde_json::from_value(value).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_custom_without_custom_type_is_rejected() {
        let result: Result<Section, _> = serde_json::from_value(
            json!({"id": "c1", "name": "X", "type": "custom", "enabled": true}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<Section, _> =
            serde_json::from_value(json!({"id": "a", "name": "A", "type": "awards"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_name_and_enabled_fall_back() {
        let section: Section =
            serde_json::from_value(json!({"id": "education", "type": "education"})).unwrap();
        assert_eq!(section.name, "Education");
        assert!(section.enabled);
    }
}
