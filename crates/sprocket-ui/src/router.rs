//! # Pointer routing
//!
//! Once per host frame the router turns the raw pointer state into element
//! events:
//!
//! 1. The pointer is mapped to device space. Left press and release are edge
//!    triggered against the previous frame; the right button is level
//!    triggered.
//! 2. An active modal takes the pointer exclusively.
//! 3. Hover is recomputed for every reachable element from containment alone.
//! 4. A left press goes to the topmost hovered element and nowhere else.
//! 5. A held right button goes to the topmost hovered element.
//! 6. A left release is broadcast to every element.
//! 7. A left press that did not land on a text box drops text focus.

use smallvec::SmallVec;
use sprocket_core::{TextureHandle, Vec2};

use crate::element::{ElementId, EventCtx};
use crate::focus::FocusManager;
use crate::modal::ModalController;
use crate::registry::ElementRegistry;

/// What a single `process_mouse` call did; handy for hosts and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseOutcome {
    pub pressed: bool,
    pub released: bool,
    /// Element that received the left press, if any.
    pub press_target: Option<ElementId>,
    pub text_box_hit: bool,
    pub modal_captured: bool,
}

#[derive(Default)]
pub struct InputRouter {
    prev_left: bool,
    left_down: bool,
    pointer: Vec2,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pointer position, device space.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn left_down(&self) -> bool {
        self.left_down
    }

    fn topmost_hovered(registry: &ElementRegistry, ids: &[ElementId]) -> Option<ElementId> {
        ids.iter()
            .copied()
            .find(|&id| registry.get(id).is_some_and(|e| e.accepts_input() && e.hovered))
    }

    pub fn process_mouse(
        &mut self,
        registry: &mut ElementRegistry,
        modal: &mut ModalController,
        pos: Vec2,
        left_down: bool,
        right_down: bool,
        ctx: EventCtx,
        releases: &mut Vec<TextureHandle>,
    ) -> MouseOutcome {
        let pointer = ctx.coords.to_device(pos);
        let pressed = left_down && !self.prev_left;
        let released = !left_down && self.prev_left;
        self.prev_left = left_down;
        self.left_down = left_down;
        self.pointer = pointer;
        let ctx = EventCtx { pointer, ..ctx };

        let mut out = MouseOutcome {
            pressed,
            released,
            ..MouseOutcome::default()
        };

        if modal.is_active() {
            modal.process_pointer(pressed, released, &ctx, releases);
            out.modal_captured = true;
            return out;
        }

        // topmost first
        let ids: SmallVec<[ElementId; 32]> = registry.ids().iter().rev().copied().collect();

        for &id in &ids {
            if let Some(e) = registry.get_mut(id) {
                e.update_hover(Some(pointer), Vec2::ZERO, ctx.coords);
            }
        }

        if pressed && let Some(id) = Self::topmost_hovered(registry, &ids) {
            let lands_on_text = registry
                .get(id)
                .is_some_and(|e| e.press_target().is_text_box());
            if lands_on_text {
                FocusManager::clear_focus(registry);
            } else {
                FocusManager::clear_text_focus(registry);
            }
            if let Some(e) = registry.get_mut(id) {
                log::trace!("press -> {:?} ({})", id, e.kind.name());
                out.text_box_hit = e.on_mouse_down(Vec2::ZERO, &ctx);
            }
            out.press_target = Some(id);
        }

        if right_down
            && let Some(id) = Self::topmost_hovered(registry, &ids)
            && let Some(e) = registry.get_mut(id)
        {
            e.right_click();
        }

        if released {
            for &id in &ids {
                if let Some(e) = registry.get_mut(id) {
                    e.on_mouse_up();
                }
            }
        }

        if pressed && !out.text_box_hit {
            FocusManager::clear_text_focus(registry);
        }
        out
    }

    /// Routes a wheel delta (logical units, positive scrolls content up) to
    /// the topmost hovered element. Returns true if any of it was consumed.
    pub fn process_wheel(
        &mut self,
        registry: &mut ElementRegistry,
        modal: &ModalController,
        pos: Vec2,
        delta_y: f32,
        ctx: EventCtx,
    ) -> bool {
        if modal.is_active() || delta_y == 0.0 {
            return false;
        }
        let pointer = ctx.coords.to_device(pos);
        self.pointer = pointer;
        let ids: SmallVec<[ElementId; 32]> = registry.ids().iter().rev().copied().collect();
        for &id in &ids {
            if let Some(e) = registry.get_mut(id) {
                e.update_hover(Some(pointer), Vec2::ZERO, ctx.coords);
            }
        }
        let Some(id) = Self::topmost_hovered(registry, &ids) else {
            return false;
        };
        registry
            .get_mut(id)
            .is_some_and(|e| e.on_wheel(delta_y) != delta_y)
    }
}
