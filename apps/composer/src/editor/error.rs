use thiserror::Error;

/// Rejections of a local edit. The document is never partially mutated when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Section heading cannot be empty")]
    BlankHeading,

    #[error("Tag cannot be empty")]
    BlankTag,

    #[error("Skill cannot be empty")]
    BlankSkill,

    #[error("Certification cannot be empty")]
    BlankCertification,

    #[error("Custom section {0} not found")]
    UnknownCustomSection(String),

    #[error("{collection} entry {id} not found")]
    UnknownEntry { collection: &'static str, id: String },

    #[error("Custom section {id} holds {actual} content, not {expected}")]
    WrongShape {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid accent color '{0}': expected #rgb or #rrggbb")]
    InvalidAccentColor(String),
}

impl EditError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EditError::UnknownCustomSection(_) | EditError::UnknownEntry { .. }
        )
    }
}
