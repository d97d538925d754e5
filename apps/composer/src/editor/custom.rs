//! Custom Section Manager: keeps the custom section store and the section order in step.
//!
//! Every operation here takes the whole document so that the two stores are always
//! changed together. Callers go through [`crate::editor::transitions`], which runs them on
//! a copy, so a rejected edit leaves the original untouched.

use tracing::debug;

use crate::editor::error::EditError;
use crate::editor::new_id;
use crate::models::custom::{CustomContent, CustomSection, ListItem};
use crate::models::section::{CustomKind, Section, SectionKind};
use crate::models::ResumeDocument;

/// Creates an empty custom section and appends it to both stores. Returns its id.
pub fn create(doc: &mut ResumeDocument, heading: &str, kind: CustomKind) -> Result<String, EditError> {
    let heading = heading.trim();
    if heading.is_empty() {
        return Err(EditError::BlankHeading);
    }

    let id = new_id();
    doc.custom_sections.push(CustomSection {
        id: id.clone(),
        heading: heading.to_string(),
        content: CustomContent::empty(kind),
    });
    doc.sections
        .push(Section::custom(id.clone(), heading.to_string(), kind));

    debug!("Created {} custom section {id}", kind.as_str());
    Ok(id)
}

/// Deletes the custom section from both stores. Unknown ids and built-in sections are
/// ignored.
pub fn remove(doc: &mut ResumeDocument, id: &str) {
    let from_store = doc.custom_sections.remove(id);
    let is_custom_slot = doc
        .sections
        .get(id)
        .is_some_and(|s| matches!(s.kind, SectionKind::Custom(_)));
    let from_order = is_custom_slot && doc.sections.remove(id);
    if from_store || from_order {
        debug!("Removed custom section {id}");
    }
}

/// Paragraph: replaces the full text.
pub fn set_text(doc: &mut ResumeDocument, id: &str, text: &str) -> Result<(), EditError> {
    match content_mut(doc, id)? {
        CustomContent::Paragraph(current) => {
            *current = text.to_string();
            Ok(())
        }
        other => Err(wrong_shape(id, CustomKind::Paragraph, other)),
    }
}

/// Tags: appends a trimmed tag. Blank tags are rejected.
pub fn add_tag(doc: &mut ResumeDocument, id: &str, tag: &str) -> Result<(), EditError> {
    match content_mut(doc, id)? {
        CustomContent::Tags(tags) => {
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(EditError::BlankTag);
            }
            tags.push(tag.to_string());
            Ok(())
        }
        other => Err(wrong_shape(id, CustomKind::Tags, other)),
    }
}

/// Tags: removes the tag at `index`; out of range is a no-op.
pub fn remove_tag(doc: &mut ResumeDocument, id: &str, index: usize) -> Result<(), EditError> {
    match content_mut(doc, id)? {
        CustomContent::Tags(tags) => {
            if index < tags.len() {
                tags.remove(index);
            }
            Ok(())
        }
        other => Err(wrong_shape(id, CustomKind::Tags, other)),
    }
}

/// List: appends an empty item and returns its id.
pub fn add_item(doc: &mut ResumeDocument, id: &str) -> Result<String, EditError> {
    match content_mut(doc, id)? {
        CustomContent::List(items) => {
            let item_id = new_id();
            items.push(ListItem {
                id: item_id.clone(),
                text: String::new(),
            });
            Ok(item_id)
        }
        other => Err(wrong_shape(id, CustomKind::List, other)),
    }
}

/// List: replaces the text of one item; unknown item ids are a no-op.
pub fn update_item(
    doc: &mut ResumeDocument,
    id: &str,
    item_id: &str,
    text: &str,
) -> Result<(), EditError> {
    match content_mut(doc, id)? {
        CustomContent::List(items) => {
            if let Some(item) = items.iter_mut().find(|i| i.id == item_id) {
                item.text = text.to_string();
            }
            Ok(())
        }
        other => Err(wrong_shape(id, CustomKind::List, other)),
    }
}

/// List: removes one item; unknown item ids are a no-op.
pub fn remove_item(doc: &mut ResumeDocument, id: &str, item_id: &str) -> Result<(), EditError> {
    match content_mut(doc, id)? {
        CustomContent::List(items) => {
            items.retain(|i| i.id != item_id);
            Ok(())
        }
        other => Err(wrong_shape(id, CustomKind::List, other)),
    }
}

fn content_mut<'a>(doc: &'a mut ResumeDocument, id: &str) -> Result<&'a mut CustomContent, EditError> {
    doc.custom_sections
        .get_mut(id)
        .map(|s| &mut s.content)
        .ok_or_else(|| EditError::UnknownCustomSection(id.to_string()))
}

fn wrong_shape(id: &str, expected: CustomKind, actual: &CustomContent) -> EditError {
    EditError::WrongShape {
        id: id.to_string(),
        expected: expected.as_str(),
        actual: actual.kind().as_str(),
    }
}
