pub mod content;
pub mod custom;
pub mod document;
pub mod section;

pub use content::ContentStore;
pub use custom::CustomSection;
pub use document::{ResumeDocument, TemplateKind};
pub use section::CustomKind;
