//! Keyboard focus.
//!
//! At most one element is focused. The focus chain is rebuilt on every Tab
//! from the visible elements (walk order, container children included) with a
//! non-negative tab index, stable-sorted by that index. Elements carry no
//! stable identity below the registry, so chain entries are positions in the
//! visible walk.

use smallvec::SmallVec;

use crate::registry::ElementRegistry;

#[derive(Clone, Copy, Debug)]
struct FocusSlot {
    tab_index: i32,
    walk_pos: usize,
}

#[derive(Default)]
pub struct FocusManager {
    chain: SmallVec<[FocusSlot; 16]>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_chain(&mut self, registry: &mut ElementRegistry) -> Option<usize> {
        self.chain.clear();
        let mut walk_pos = 0;
        let mut current = None;
        let chain = &mut self.chain;
        registry.walk_visible_mut(&mut |e| {
            if e.tab_index >= 0 {
                if e.focused && current.is_none() {
                    current = Some(walk_pos);
                }
                chain.push(FocusSlot {
                    tab_index: e.tab_index,
                    walk_pos,
                });
            }
            walk_pos += 1;
        });
        self.chain.sort_by_key(|s| s.tab_index);
        current.and_then(|pos| self.chain.iter().position(|s| s.walk_pos == pos))
    }

    /// Moves focus to the next (or, `backwards`, previous) tabbable element,
    /// wrapping around. Returns the new position in the chain.
    pub fn cycle_focus(&mut self, registry: &mut ElementRegistry, backwards: bool) -> Option<usize> {
        let current = self.rebuild_chain(registry);
        let n = self.chain.len();
        if n == 0 {
            return None;
        }
        let next = match current {
            None => 0,
            Some(i) if backwards => (i + n - 1) % n,
            Some(i) => (i + 1) % n,
        };
        let target = self.chain[next].walk_pos;

        Self::clear_focus(registry);
        let mut walk_pos = 0;
        registry.walk_visible_mut(&mut |e| {
            if walk_pos == target {
                e.focused = true;
                log::debug!("focus -> {} (tab {})", e.kind.name(), e.tab_index);
            }
            walk_pos += 1;
        });
        Some(next)
    }

    pub fn clear_focus(registry: &mut ElementRegistry) {
        registry.walk_mut(&mut |e| e.focused = false);
    }

    pub fn clear_text_focus(registry: &mut ElementRegistry) {
        registry.walk_mut(&mut |e| {
            if e.is_text_box() {
                e.focused = false;
            }
        });
    }

    /// Number of tabbable elements seen by the last cycle.
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}
