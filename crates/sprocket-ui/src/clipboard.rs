use std::cell::RefCell;
use std::rc::Rc;

/// The one clipboard slot shared by every text box of a [`crate::Ui`].
///
/// Single slot, last write wins. Clones refer to the same slot. Not `Send`:
/// all access happens on the UI thread.
#[derive(Clone, Default)]
pub struct Clipboard {
    slot: Rc<RefCell<Option<String>>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.slot.borrow_mut() = Some(text.into());
    }

    pub fn get(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().as_deref().is_none_or(str::is_empty)
    }
}

impl std::fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipboard")
            .field("len", &self.slot.borrow().as_ref().map(String::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_across_clones() {
        let a = Clipboard::new();
        let b = a.clone();
        a.set("first");
        b.set("second");
        assert_eq!(a.get().as_deref(), Some("second"));
        b.clear();
        assert!(a.is_empty());
    }
}
