//! Single-line text editing state machine.
//!
//! Indices count grapheme clusters, so a caret never lands inside a
//! multi-codepoint character. `caret`, `selection_start` and `selection_end`
//! are kept in `[0, len]` by every operation; the selection pair is stored
//! unordered and normalized on read.

use sprocket_core::{Key, KeyEvent, TextMeasure, Vec2};
use unicode_segmentation::UnicodeSegmentation;
use web_time::Duration;

use crate::clipboard::Clipboard;

fn is_whitespace(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word at `from`: back over whitespace, then over non-whitespace.
pub fn word_start(text: &str, from: usize) -> usize {
    let ws: Vec<bool> = text.graphemes(true).map(is_whitespace).collect();
    let mut i = from.min(ws.len());
    while i > 0 && ws[i - 1] {
        i -= 1;
    }
    while i > 0 && !ws[i - 1] {
        i -= 1;
    }
    i
}

/// End of the word at `from`: forward over whitespace, then over non-whitespace.
pub fn word_end(text: &str, from: usize) -> usize {
    let ws: Vec<bool> = text.graphemes(true).map(is_whitespace).collect();
    let mut i = from.min(ws.len());
    while i < ws.len() && ws[i] {
        i += 1;
    }
    while i < ws.len() && !ws[i] {
        i += 1;
    }
    i
}

/// Byte offset of grapheme index `idx` (clamped to the text end).
fn byte_offset(text: &str, idx: usize) -> usize {
    text.grapheme_indices(true)
        .nth(idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Drops control characters (including newlines); the field is single line.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).collect()
}

#[derive(Clone, Debug)]
pub struct TextEditState {
    text: String,
    len: usize,
    caret: usize,
    selection_start: usize,
    selection_end: usize,
    selection_anchor: usize,
    pub scroll_x: f32,

    dragging: bool,
    drag_origin: Vec2,
    drag_moved: bool,
    last_click: Option<Duration>,

    blink_timer: f32,
    caret_visible: bool,
}

impl Default for TextEditState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEditState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            len: 0,
            caret: 0,
            selection_start: 0,
            selection_end: 0,
            selection_anchor: 0,
            scroll_x: 0.0,
            dragging: false,
            drag_origin: Vec2::ZERO,
            drag_moved: false,
            last_click: None,
            blink_timer: 0.0,
            caret_visible: false,
        }
    }

    pub fn with_text(text: &str) -> Self {
        let mut st = Self::new();
        st.set_text(text);
        st
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in graphemes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Normalized `(low, high)` selection.
    pub fn selection(&self) -> (usize, usize) {
        (
            self.selection_start.min(self.selection_end),
            self.selection_start.max(self.selection_end),
        )
    }

    /// Selection endpoints as stored: `(anchor side, caret side)`.
    pub fn selection_raw(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    pub fn anchor(&self) -> usize {
        self.selection_anchor
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    pub fn selected_text(&self) -> &str {
        let (lo, hi) = self.selection();
        &self.text[byte_offset(&self.text, lo)..byte_offset(&self.text, hi)]
    }

    /// The first `idx` graphemes.
    pub fn prefix(&self, idx: usize) -> &str {
        &self.text[..byte_offset(&self.text, idx)]
    }

    /// Replaces the whole text; caret and selection are clamped into range.
    pub fn set_text(&mut self, text: &str) {
        self.text = sanitize(text);
        self.len = self.text.graphemes(true).count();
        self.clamp_indices();
    }

    fn clamp_indices(&mut self) {
        self.caret = self.caret.min(self.len);
        self.selection_start = self.selection_start.min(self.len);
        self.selection_end = self.selection_end.min(self.len);
        self.selection_anchor = self.selection_anchor.min(self.len);
    }

    fn collapse_to(&mut self, idx: usize) {
        let idx = idx.min(self.len);
        self.caret = idx;
        self.selection_start = idx;
        self.selection_end = idx;
        self.selection_anchor = idx;
    }

    /// Moves the caret to `to`. With `extend`, the selection grows from the
    /// anchor, which is captured from the pre-move caret when no selection
    /// was active.
    pub fn move_caret(&mut self, to: usize, extend: bool) {
        let to = to.min(self.len);
        if extend {
            if !self.has_selection() {
                self.selection_anchor = self.caret;
            }
            self.caret = to;
            self.selection_start = self.selection_anchor;
            self.selection_end = to;
        } else {
            self.collapse_to(to);
        }
        self.reset_blink();
    }

    pub fn move_left(&mut self, by_word: bool, extend: bool) {
        let to = if by_word {
            word_start(&self.text, self.caret)
        } else {
            self.caret.saturating_sub(1)
        };
        self.move_caret(to, extend);
    }

    pub fn move_right(&mut self, by_word: bool, extend: bool) {
        let to = if by_word {
            word_end(&self.text, self.caret)
        } else {
            (self.caret + 1).min(self.len)
        };
        self.move_caret(to, extend);
    }

    pub fn select_all(&mut self) {
        self.selection_anchor = 0;
        self.selection_start = 0;
        self.selection_end = self.len;
        self.caret = self.len;
        self.reset_blink();
    }

    fn replace_range(&mut self, lo: usize, hi: usize, with: &str) {
        let b0 = byte_offset(&self.text, lo);
        let b1 = byte_offset(&self.text, hi);
        self.text.replace_range(b0..b1, with);
        self.len = self.text.graphemes(true).count();
    }

    /// Replaces the selection (or inserts at the caret) with `input`. Returns
    /// false when nothing changed.
    pub fn insert(&mut self, input: &str) -> bool {
        let input = sanitize(input);
        if input.is_empty() {
            return false;
        }
        let (lo, hi) = if self.has_selection() {
            self.selection()
        } else {
            (self.caret, self.caret)
        };
        let before = self.len;
        self.replace_range(lo, hi, &input);
        // graphemes may merge with neighbours, so derive the inserted length
        let inserted = (self.len + (hi - lo)).saturating_sub(before);
        self.collapse_to(lo + inserted);
        self.reset_blink();
        true
    }

    pub fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (lo, hi) = self.selection();
        self.replace_range(lo, hi, "");
        self.collapse_to(lo);
        self.reset_blink();
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        let at = self.caret - 1;
        self.replace_range(at, self.caret, "");
        self.collapse_to(at);
        self.reset_blink();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret >= self.len {
            return false;
        }
        let at = self.caret;
        self.replace_range(at, at + 1, "");
        self.collapse_to(at);
        self.reset_blink();
        true
    }

    pub fn copy(&self, clipboard: &Clipboard) -> bool {
        if !self.has_selection() {
            return false;
        }
        clipboard.set(self.selected_text());
        true
    }

    pub fn cut(&mut self, clipboard: &Clipboard) -> bool {
        self.copy(clipboard) && self.delete_selection()
    }

    pub fn paste(&mut self, clipboard: &Clipboard) -> bool {
        match clipboard.get() {
            Some(s) if !s.is_empty() => self.insert(&s),
            _ => false,
        }
    }

    /// Handles an editing/navigation key. Returns `(handled, text_changed)`.
    pub fn handle_key(&mut self, ev: &KeyEvent, clipboard: &Clipboard) -> (bool, bool) {
        let shift = ev.modifiers.shift();
        let ctrl = ev.modifiers.ctrl();
        if ev.is_shortcut('a') {
            self.select_all();
            return (true, false);
        }
        if ev.is_shortcut('c') {
            self.copy(clipboard);
            return (true, false);
        }
        if ev.is_shortcut('x') {
            return (true, self.cut(clipboard));
        }
        if ev.is_shortcut('v') {
            return (true, self.paste(clipboard));
        }
        match ev.key {
            Key::ArrowLeft => self.move_left(ctrl, shift),
            Key::ArrowRight => self.move_right(ctrl, shift),
            Key::Home => self.move_caret(0, shift),
            Key::End => self.move_caret(self.len, shift),
            Key::Delete => return (true, self.delete_forward()),
            _ => return (false, false),
        }
        (true, false)
    }

    /// First prefix length whose width reaches `x` (content coordinates,
    /// scroll already applied); the full length when none does.
    pub fn index_for_x(&self, x: f32, measure: &dyn TextMeasure, font_size: f32) -> usize {
        (0..=self.len)
            .find(|&n| measure.measure_text_width(self.prefix(n), font_size) >= x)
            .unwrap_or(self.len)
    }

    /// Caret placement for a press at grapheme `idx`. A press within
    /// `double_click` of the previous one selects the word under it. Either
    /// way a drag starts, anchored at the resulting caret.
    pub fn press(&mut self, idx: usize, now: Duration, double_click: Duration, pointer: Vec2) {
        let idx = idx.min(self.len);
        let is_double = self
            .last_click
            .is_some_and(|last| now.saturating_sub(last) < double_click);
        if is_double {
            let start = word_start(&self.text, idx);
            let end = word_end(&self.text, idx);
            self.selection_start = start;
            self.selection_end = end;
            self.caret = end;
        } else {
            self.collapse_to(idx);
        }
        self.last_click = Some(now);
        self.selection_anchor = self.caret;
        self.dragging = true;
        self.drag_origin = pointer;
        self.drag_moved = false;
        self.reset_blink();
    }

    /// Drag step: no-op until the pointer has left the press position.
    pub fn drag_to(&mut self, idx: usize, pointer: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        if !self.drag_moved {
            if pointer == self.drag_origin {
                return false;
            }
            self.drag_moved = true;
        }
        let idx = idx.min(self.len);
        self.caret = idx;
        self.selection_start = self.selection_anchor;
        self.selection_end = idx;
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_moved = false;
    }

    /// Keeps the caret inside `[scroll_x, scroll_x + inner_width]`.
    pub fn ensure_caret_visible(&mut self, measure: &dyn TextMeasure, font_size: f32, inner_width: f32) {
        let caret_x = measure.measure_text_width(self.prefix(self.caret), font_size);
        if caret_x < self.scroll_x {
            self.scroll_x = caret_x;
        } else if caret_x > self.scroll_x + inner_width {
            self.scroll_x = caret_x - inner_width.max(0.0);
        }
        self.scroll_x = self.scroll_x.max(0.0);
    }

    pub fn reset_blink(&mut self) {
        self.blink_timer = 0.0;
        self.caret_visible = true;
    }

    pub fn tick_blink(&mut self, dt: f32, focused: bool, interval: f32) {
        if !focused {
            self.blink_timer = 0.0;
            self.caret_visible = false;
            return;
        }
        if interval <= 0.0 {
            self.caret_visible = true;
            return;
        }
        self.blink_timer += dt;
        while self.blink_timer >= interval {
            self.blink_timer -= interval;
            self.caret_visible = !self.caret_visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::{Modifiers, MonospaceMeasure};

    const PX: f32 = 10.0;

    // 10 logical units per character
    fn mono() -> MonospaceMeasure {
        MonospaceMeasure::with_advance(10.0, PX)
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::plain(k)
    }

    fn shift(k: Key) -> KeyEvent {
        KeyEvent::new(k, Modifiers::SHIFT)
    }

    fn ctrl(k: Key) -> KeyEvent {
        KeyEvent::new(k, Modifiers::CONTROL)
    }

    fn assert_in_range(st: &TextEditState) {
        assert!(st.caret() <= st.len());
        let (a, b) = st.selection_raw();
        assert!(a <= st.len() && b <= st.len());
    }

    #[test]
    fn test_textfield_insert() {
        let mut state = TextEditState::new();
        state.insert("Hello");
        assert_eq!(state.text(), "Hello");
        assert_eq!(state.caret(), 5);
        assert_eq!(state.selection(), (5, 5));
    }

    #[test]
    fn test_textfield_backspace() {
        let mut state = TextEditState::with_text("Hello");
        state.move_caret(5, false);
        state.backspace();
        assert_eq!(state.text(), "Hell");
        assert_eq!(state.caret(), 4);
    }

    #[test]
    fn test_textfield_replace_selection() {
        let mut state = TextEditState::with_text("Hello World");
        state.move_caret(0, false);
        state.move_caret(5, true);
        state.insert("Hi");
        assert_eq!(state.text(), "Hi World");
        assert_eq!(state.caret(), 2);
        assert!(!state.has_selection());
    }

    #[test]
    fn word_boundaries_skip_whitespace_then_word() {
        let t = "hello world";
        assert_eq!(word_start(t, 11), 6);
        assert_eq!(word_start(t, 6), 0);
        assert_eq!(word_start(t, 3), 0);
        assert_eq!(word_start(t, 0), 0);
        assert_eq!(word_end(t, 0), 5);
        assert_eq!(word_end(t, 5), 11);
        assert_eq!(word_end(t, 11), 11);
    }

    #[test]
    fn double_click_selects_word() {
        let mut st = TextEditState::with_text("hello world");
        let m = mono();
        let idx = st.index_for_x(30.0, &m, PX);
        assert_eq!(idx, 3);

        let window = Duration::from_millis(400);
        st.press(idx, Duration::from_millis(1000), window, Vec2::new(38.0, 5.0));
        st.end_drag();
        st.press(idx, Duration::from_millis(1200), window, Vec2::new(38.0, 5.0));
        assert_eq!(st.selection(), (0, 5));
        assert_eq!(st.caret(), 5);
        assert_eq!(st.selected_text(), "hello");

        // holding still keeps the word selected
        assert!(!st.drag_to(3, Vec2::new(38.0, 5.0)));
        assert_eq!(st.selection(), (0, 5));
    }

    #[test]
    fn slow_second_click_just_moves_caret() {
        let mut st = TextEditState::with_text("hello world");
        let window = Duration::from_millis(400);
        st.press(3, Duration::from_millis(0), window, Vec2::ZERO);
        st.press(3, Duration::from_millis(400), window, Vec2::ZERO);
        assert_eq!(st.caret(), 3);
        assert!(!st.has_selection());
    }

    #[test]
    fn drag_extends_from_fixed_anchor() {
        let mut st = TextEditState::with_text("hello world");
        st.press(2, Duration::ZERO, Duration::from_millis(400), Vec2::new(20.0, 0.0));
        assert!(st.drag_to(7, Vec2::new(70.0, 0.0)));
        assert_eq!(st.selection_raw(), (2, 7));
        assert!(st.drag_to(0, Vec2::new(0.0, 0.0)));
        assert_eq!(st.selection_raw(), (2, 0));
        assert_eq!(st.selection(), (0, 2));
        assert_eq!(st.caret(), 0);
        st.end_drag();
        assert!(!st.drag_to(5, Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn index_for_x_falls_back_to_len() {
        let st = TextEditState::with_text("abc");
        let m = mono();
        assert_eq!(st.index_for_x(-5.0, &m, PX), 0);
        assert_eq!(st.index_for_x(11.0, &m, PX), 2);
        assert_eq!(st.index_for_x(500.0, &m, PX), 3);
    }

    #[test]
    fn shift_navigation_grows_from_pre_move_caret() {
        let cb = Clipboard::new();
        let mut st = TextEditState::with_text("hello world");
        st.move_caret(5, false);
        st.handle_key(&shift(Key::ArrowRight), &cb);
        st.handle_key(&shift(Key::ArrowRight), &cb);
        assert_eq!(st.selection_raw(), (5, 7));
        st.handle_key(&shift(Key::ArrowLeft), &cb);
        st.handle_key(&shift(Key::ArrowLeft), &cb);
        st.handle_key(&shift(Key::ArrowLeft), &cb);
        assert_eq!(st.selection(), (4, 5));
        assert_eq!(st.anchor(), 5);

        st.handle_key(&key(Key::ArrowLeft), &cb);
        assert!(!st.has_selection());
        assert_eq!(st.caret(), 3);

        st.handle_key(&KeyEvent::new(Key::End, Modifiers::SHIFT), &cb);
        assert_eq!(st.selection(), (3, 11));
    }

    #[test]
    fn ctrl_arrows_jump_words() {
        let cb = Clipboard::new();
        let mut st = TextEditState::with_text("one two  three");
        st.move_caret(0, false);
        st.handle_key(&ctrl(Key::ArrowRight), &cb);
        assert_eq!(st.caret(), 3);
        st.handle_key(&ctrl(Key::ArrowRight), &cb);
        assert_eq!(st.caret(), 7);
        st.handle_key(&ctrl(Key::ArrowRight), &cb);
        assert_eq!(st.caret(), 14);
        st.handle_key(&ctrl(Key::ArrowLeft), &cb);
        assert_eq!(st.caret(), 9);
        st.handle_key(&KeyEvent::new(Key::ArrowLeft, Modifiers::CONTROL | Modifiers::SHIFT), &cb);
        assert_eq!(st.caret(), 4);
        assert_eq!(st.selected_text(), "two  ");
    }

    #[test]
    fn select_all_then_delete_empties() {
        let cb = Clipboard::new();
        let mut st = TextEditState::new();
        st.insert("a");
        st.insert("b");
        st.insert("c");
        st.handle_key(&ctrl(Key::Character('a')), &cb);
        assert_eq!(st.selection(), (0, 3));
        assert_eq!(st.caret(), 3);
        let (handled, changed) = st.handle_key(&key(Key::Delete), &cb);
        assert!(handled && changed);
        assert_eq!(st.text(), "");
        assert_eq!(st.caret(), 0);
    }

    #[test]
    fn clipboard_round_trip_through_cut_and_paste() {
        let cb = Clipboard::new();
        let mut st = TextEditState::with_text("hello world");
        // copy without selection leaves the slot alone
        st.handle_key(&ctrl(Key::Character('c')), &cb);
        assert!(cb.is_empty());

        st.move_caret(0, false);
        st.move_caret(6, true);
        st.handle_key(&ctrl(Key::Character('x')), &cb);
        assert_eq!(st.text(), "world");
        assert_eq!(cb.get().as_deref(), Some("hello "));

        st.move_caret(5, false);
        st.insert(" ");
        st.handle_key(&ctrl(Key::Character('v')), &cb);
        assert_eq!(st.text(), "world hello ");
        assert_eq!(st.caret(), 12);
    }

    #[test]
    fn paste_replaces_selection() {
        let cb = Clipboard::new();
        cb.set("XY");
        let mut st = TextEditState::with_text("abcdef");
        st.move_caret(1, false);
        st.move_caret(4, true);
        st.paste(&cb);
        assert_eq!(st.text(), "aXYef");
        assert_eq!(st.caret(), 3);
    }

    #[test]
    fn control_characters_are_filtered() {
        let mut st = TextEditState::new();
        assert!(!st.insert("\n\r\t"));
        st.insert("a\nb");
        assert_eq!(st.text(), "ab");
    }

    #[test]
    fn control_only_fragment_keeps_selection() {
        let cb = Clipboard::new();
        let mut st = TextEditState::with_text("keep me");
        st.select_all();
        assert!(!st.insert("\u{1b}"));
        assert!(!st.insert("\t"));
        assert_eq!(st.text(), "keep me");
        assert!(st.has_selection());

        cb.set("\r\n");
        assert!(!st.paste(&cb));
        assert_eq!(st.text(), "keep me");
    }

    #[test]
    fn grapheme_clusters_move_as_one() {
        let mut st = TextEditState::with_text("A👍🏽B");
        assert_eq!(st.len(), 3);
        st.move_caret(3, false);
        st.move_left(false, false);
        st.backspace();
        assert_eq!(st.text(), "AB");
        assert_eq!(st.caret(), 1);
    }

    #[test]
    fn indices_stay_in_range_under_any_sequence() {
        let cb = Clipboard::new();
        let mut st = TextEditState::new();
        let keys = [
            ctrl(Key::Character('a')),
            key(Key::Delete),
            shift(Key::ArrowLeft),
            key(Key::End),
            ctrl(Key::ArrowLeft),
            shift(Key::Home),
            ctrl(Key::Character('x')),
            ctrl(Key::Character('v')),
            key(Key::ArrowRight),
            ctrl(Key::ArrowRight),
        ];
        for round in 0..40 {
            if round % 3 == 0 {
                st.insert("ab cd");
            }
            if round % 5 == 0 {
                st.backspace();
            }
            st.handle_key(&keys[round % keys.len()], &cb);
            assert_in_range(&st);
        }
        st.set_text("x");
        assert_in_range(&st);
    }

    #[test]
    fn scroll_follows_caret_and_never_goes_negative() {
        let m = mono();
        let mut st = TextEditState::with_text("abcdefghijklmnopqrst");
        st.move_caret(20, false);
        st.ensure_caret_visible(&m, PX, 50.0);
        assert_eq!(st.scroll_x, 150.0);
        st.move_caret(10, false);
        st.ensure_caret_visible(&m, PX, 50.0);
        assert_eq!(st.scroll_x, 100.0);
        st.move_caret(0, false);
        st.ensure_caret_visible(&m, PX, 50.0);
        assert_eq!(st.scroll_x, 0.0);
    }

    #[test]
    fn caret_blinks_only_while_focused() {
        let mut st = TextEditState::new();
        st.reset_blink();
        st.tick_blink(0.3, true, 0.5);
        assert!(st.caret_visible());
        st.tick_blink(0.3, true, 0.5);
        assert!(!st.caret_visible());
        st.tick_blink(0.5, true, 0.5);
        assert!(st.caret_visible());
        st.tick_blink(0.1, false, 0.5);
        assert!(!st.caret_visible());
        st.tick_blink(5.0, false, 0.5);
        assert!(!st.caret_visible());
    }
}
