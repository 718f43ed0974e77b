use slotmap::SlotMap;
use sprocket_core::TextureHandle;

use crate::element::{Element, ElementId};

/// Owns every top-level element, ordered by ascending z-index. Equal z keeps
/// insertion order.
#[derive(Default)]
pub struct ElementRegistry {
    elements: SlotMap<ElementId, Element>,
    order: Vec<ElementId>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        let id = self.elements.insert(element);
        self.order.push(id);
        self.resort();
        log::trace!("element {:?} added ({} total)", id, self.order.len());
        id
    }

    /// Disposes and removes `id`. Owned textures are queued in `releases`.
    pub fn remove(&mut self, id: ElementId, releases: &mut Vec<TextureHandle>) -> Option<Element> {
        let mut e = self.elements.remove(id)?;
        e.release_textures(releases);
        self.order.retain(|&o| o != id);
        Some(e)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in draw order (ascending z).
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ElementId, &Element)> {
        self.order.iter().map(|&id| (id, &self.elements[id]))
    }

    pub fn set_z_index(&mut self, id: ElementId, z: i32) {
        if let Some(e) = self.elements.get_mut(id) {
            e.z_index = z;
            self.resort();
        }
    }

    fn resort(&mut self) {
        let elements = &self.elements;
        self.order.sort_by_key(|id| elements[*id].z_index);
    }

    /// Pre-order over every element in draw order, children included.
    pub fn walk(&self, f: &mut dyn FnMut(&Element)) {
        for &id in &self.order {
            self.elements[id].walk(f);
        }
    }

    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for &id in &self.order {
            if let Some(e) = self.elements.get_mut(id) {
                e.walk_mut(f);
            }
        }
    }

    pub fn walk_visible_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for &id in &self.order {
            if let Some(e) = self.elements.get_mut(id) {
                e.walk_visible_mut(f);
            }
        }
    }

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        self.order
            .iter()
            .find_map(|&id| self.elements[id].find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        // locate first, then borrow mutably once
        let id = self
            .order
            .iter()
            .copied()
            .find(|&id| self.elements[id].find(pred).is_some())?;
        self.elements.get_mut(id)?.find_mut(pred)
    }

    /// Queues every owned texture for release; used when the viewport changes.
    pub fn release_all_textures(&mut self, releases: &mut Vec<TextureHandle>) {
        for e in self.elements.values_mut() {
            e.release_textures(releases);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::{MonospaceMeasure, SceneRenderer, UiConfig, Vec2};

    fn labels(reg: &ElementRegistry) -> Vec<String> {
        reg.iter()
            .filter_map(|(_, e)| e.as_button().map(|b| b.label.clone()))
            .collect()
    }

    #[test]
    fn sort_is_stable_for_equal_z() {
        let mut reg = ElementRegistry::new();
        reg.add(Element::button("a", || {}).z(1));
        reg.add(Element::button("b", || {}).z(0));
        reg.add(Element::button("c", || {}).z(1));
        reg.add(Element::button("d", || {}).z(0));
        assert_eq!(labels(&reg), ["b", "d", "a", "c"]);
    }

    #[test]
    fn set_z_reorders() {
        let mut reg = ElementRegistry::new();
        let a = reg.add(Element::button("a", || {}));
        reg.add(Element::button("b", || {}));
        reg.set_z_index(a, 10);
        assert_eq!(labels(&reg), ["b", "a"]);
    }

    #[test]
    fn remove_queues_owned_texture() {
        let mut reg = ElementRegistry::new();
        let id = reg.add(Element::button("ok", || {}).sized(80.0, 30.0));
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let cfg = UiConfig::default();
        if let Some(e) = reg.get_mut(id) {
            e.draw(&mut r, Vec2::ZERO, &cfg);
        }
        assert_eq!(r.live_textures(), 1);

        let mut releases = Vec::new();
        assert!(reg.remove(id, &mut releases).is_some());
        assert_eq!(releases.len(), 1);
        assert!(reg.get(id).is_none());
        assert!(reg.remove(id, &mut releases).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn find_reaches_container_children() {
        let mut reg = ElementRegistry::new();
        reg.add(
            Element::scroll_container()
                .sized(100.0, 100.0)
                .child(Element::checkbox("inner", false, |_| {})),
        );
        let found = reg.find_mut(&|e| e.as_checkbox().is_some());
        assert!(found.is_some());
    }
}
