//! # Scroll containers
//!
//! A `ScrollContainer` owns its children outright. Child positions are
//! relative to the container's content origin, which sits `scroll_y` logical
//! units above the container's top edge.
//!
//! Input reaches children through the container: hover, mouse-down (topmost
//! hovered child wins), right-click, mouse-up (broadcast), per-frame update and
//! the wheel. Wheel deltas go to the innermost hovered container first;
//! whatever it cannot consume bubbles to the enclosing one, the same way
//! nested scroll views hand leftover motion to their parents.

use sprocket_core::{CoordinateSpace, Vec2};

use crate::element::Element;

#[derive(Default)]
pub struct ScrollContainer {
    pub children: Vec<Element>,
    pub scroll_y: f32,
}

impl ScrollContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `child` keeping children in stable ascending z order.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
        self.children.sort_by_key(|c| c.z_index);
    }

    /// Bottom edge of the lowest visible child, logical units.
    pub fn content_height(&self) -> f32 {
        self.children
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.pos.y + c.size.height)
            .fold(0.0, f32::max)
    }

    pub fn max_scroll(&self, viewport_h: f32) -> f32 {
        (self.content_height() - viewport_h).max(0.0)
    }

    /// Applies as much of `dy` as the scroll range allows and returns the rest.
    pub fn scroll_immediate(&mut self, dy: f32, viewport_h: f32) -> f32 {
        let before = self.scroll_y;
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, self.max_scroll(viewport_h));
        dy - (self.scroll_y - before)
    }

    /// Re-clamps after children or the viewport changed size.
    pub fn clamp_scroll(&mut self, viewport_h: f32) {
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll(viewport_h));
    }

    pub(crate) fn content_origin(&self, device_pos: Vec2, coords: &CoordinateSpace) -> Vec2 {
        device_pos.offset(0.0, -self.scroll_y * coords.scale().y)
    }

    pub(crate) fn hovered_child(&self) -> Option<&Element> {
        self.children
            .iter()
            .rev()
            .find(|c| c.accepts_input() && c.hovered)
    }

    pub(crate) fn hovered_child_mut(&mut self) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .rev()
            .find(|c| c.accepts_input() && c.hovered)
    }
}
