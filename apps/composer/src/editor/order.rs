//! Section Order Model: the single source of document order.
//!
//! Moves are adjacent transpositions and are silent no-ops at the boundaries. Disabling a
//! section keeps its slot; the renderer skips it.

use serde::{Deserialize, Serialize};

use crate::models::section::{Section, SectionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionOrder(Vec<Section>);

impl Default for SectionOrder {
    /// The six built-in sections, all enabled.
    fn default() -> Self {
        Self(SectionKind::BUILT_IN.into_iter().map(Section::built_in).collect())
    }
}

impl SectionOrder {
    pub fn new(sections: Vec<Section>) -> Self {
        Self(sections)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.0.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// First section of the given kind, if any.
    pub fn find_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.0.iter().find(|s| s.kind == kind)
    }

    /// Swaps `index` with its predecessor. No-op at 0 or out of range.
    pub fn move_up(&mut self, index: usize) {
        if index == 0 || index >= self.0.len() {
            return;
        }
        self.0.swap(index - 1, index);
    }

    /// Swaps `index` with its successor. No-op at the last index or out of range.
    pub fn move_down(&mut self, index: usize) {
        if index.saturating_add(1) >= self.0.len() {
            return;
        }
        self.0.swap(index, index + 1);
    }

    /// Flips `enabled` on the section with `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) {
        if let Some(section) = self.0.iter_mut().find(|s| s.id == id) {
            section.enabled = !section.enabled;
        }
    }

    pub fn push(&mut self, section: Section) {
        self.0.push(section);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s.id != id);
        self.0.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::CustomKind;

    fn ids(order: &SectionOrder) -> Vec<&str> {
        order.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            ids(&SectionOrder::default()),
            vec!["profile", "skills", "education", "experience", "projects", "certifications"]
        );
    }

    #[test]
    fn test_move_up_at_zero_is_noop() {
        let mut order = SectionOrder::default();
        let before = order.clone();
        order.move_up(0);
        assert_eq!(order, before);
    }

    #[test]
    fn test_move_down_at_last_is_noop() {
        let mut order = SectionOrder::default();
        let before = order.clone();
        order.move_down(order.len() - 1);
        assert_eq!(order, before);
    }

    #[test]
    fn test_out_of_range_moves_are_noops() {
        let mut order = SectionOrder::default();
        let before = order.clone();
        order.move_up(42);
        order.move_down(42);
        assert_eq!(order, before);
    }

    #[test]
    fn test_move_up_swaps_with_predecessor() {
        let mut order = SectionOrder::default();
        order.move_up(2);
        assert_eq!(&ids(&order)[..3], &["profile", "education", "skills"]);
    }

    #[test]
    fn test_move_down_swaps_with_successor() {
        let mut order = SectionOrder::default();
        order.move_down(0);
        assert_eq!(&ids(&order)[..2], &["skills", "profile"]);
    }

    #[test]
    fn test_toggle_twice_restores_every_section() {
        let mut order = SectionOrder::default();
        order.push(Section::custom("c1".into(), "Awards".into(), CustomKind::List));
        let before = order.clone();
        let all_ids: Vec<String> = order.iter().map(|s| s.id.clone()).collect();
        for id in &all_ids {
            order.toggle(id);
            assert!(!order.get(id).unwrap().enabled);
            order.toggle(id);
        }
        assert_eq!(order, before);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut order = SectionOrder::default();
        let before = order.clone();
        order.toggle("missing");
        assert_eq!(order, before);
    }

    #[test]
    fn test_disabled_section_keeps_its_slot() {
        let mut order = SectionOrder::default();
        order.toggle("education");
        assert_eq!(order.len(), 6);
        assert_eq!(ids(&order)[2], "education");
    }
}
