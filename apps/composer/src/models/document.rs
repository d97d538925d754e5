use serde::{Deserialize, Serialize};

use crate::editor::order::SectionOrder;
use crate::models::content::ContentStore;
use crate::models::custom::CustomSectionStore;
use crate::render::color::AccentColor;

/// The two layouts a document can be rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    #[serde(rename = "classic")]
    Classic,
    #[serde(rename = "two-side")]
    TwoSide,
}

impl TemplateKind {
    /// Value of `resumeFormat` in the persisted record.
    pub fn format_str(&self) -> &'static str {
        match self {
            TemplateKind::Classic => "classic",
            TemplateKind::TwoSide => "two-side",
        }
    }

    /// Value of `template` in the persisted record.
    pub fn template_id(&self) -> &'static str {
        match self {
            TemplateKind::Classic => "dynamic-classic",
            TemplateKind::TwoSide => "dynamic-two-side",
        }
    }

    /// Accepts either a format string or a template id.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" | "dynamic-classic" => Some(TemplateKind::Classic),
            "two-side" | "twoside" | "two_side" | "dynamic-two-side" => {
                Some(TemplateKind::TwoSide)
            }
            _ => None,
        }
    }
}

/// The whole editable résumé. Every edit produces a new value of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub content: ContentStore,
    pub custom_sections: CustomSectionStore,
    pub sections: SectionOrder,
    pub template: TemplateKind,
    pub accent_color: AccentColor,
}
