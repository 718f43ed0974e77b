use bitflags::bitflags;

bitflags! {
    /// Modifier keys held while a key event fired.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
    }
}

impl Modifiers {
    pub fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }
    pub fn ctrl(self) -> bool {
        self.contains(Modifiers::CONTROL)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter/digit keys, lowercase. Used for shortcuts (Ctrl+A, Ctrl+C...).
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// True for `Ctrl+<c>` with `c` compared case-insensitively.
    pub fn is_shortcut(&self, c: char) -> bool {
        self.modifiers.ctrl()
            && matches!(self.key, Key::Character(k) if k.eq_ignore_ascii_case(&c))
    }
}
