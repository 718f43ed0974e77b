use std::rc::Rc;

use sprocket_core::{Border, KeyEvent, Palette, Rect, Renderer, Size, Vec2};

use crate::element::{EventCtx, UpdateCtx};
use crate::text_cache::{TextCache, TextKey};
use crate::textfield::TextEditState;

const CARET_W: f32 = 1.5;
const CARET_INSET: f32 = 4.0;

/// Single-line editable field.
///
/// Keyboard input reaches a text box only while it is focused. Backspace is
/// routed here by [`crate::Ui`] rather than through [`TextBox::key`].
pub struct TextBox {
    pub edit: TextEditState,
    pub hint: String,
    pub on_change: Option<Rc<dyn Fn(&str)>>,
    had_focus: bool,
}

impl TextBox {
    pub fn new(hint: impl Into<String>) -> Self {
        Self {
            edit: TextEditState::new(),
            hint: hint.into(),
            on_change: None,
            had_focus: false,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.edit.set_text(text);
        self
    }

    pub fn on_change(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn text(&self) -> &str {
        self.edit.text()
    }

    fn inner_width(size: Size, padding: f32) -> f32 {
        (size.width - 2.0 * padding).max(0.0)
    }

    fn notify(&self) {
        if let Some(cb) = &self.on_change {
            cb(self.edit.text());
        }
    }

    fn follow_caret(&mut self, size: Size, font_size: f32, measure: &dyn sprocket_core::TextMeasure, padding: f32) {
        self.edit
            .ensure_caret_visible(measure, font_size, Self::inner_width(size, padding));
    }

    /// Logical x inside the text content for a device-space x local to the box.
    fn content_x(&self, local_device_x: f32, scale_x: f32, padding: f32) -> f32 {
        local_device_x / scale_x - padding + self.edit.scroll_x
    }

    pub(crate) fn mouse_down(&mut self, local: Vec2, size: Size, font_size: f32, ctx: &EventCtx) {
        let pad = ctx.config.text_padding_x;
        let x = self.content_x(local.x, ctx.coords.scale().x, pad);
        let idx = self.edit.index_for_x(x, ctx.measure, font_size);
        self.edit
            .press(idx, ctx.now, ctx.config.double_click_window(), ctx.pointer);
        self.follow_caret(size, font_size, ctx.measure, pad);
    }

    pub(crate) fn mouse_up(&mut self) {
        self.edit.end_drag();
    }

    pub(crate) fn update(&mut self, local: Vec2, size: Size, font_size: f32, focused: bool, ctx: &UpdateCtx) {
        if focused && !self.had_focus {
            self.edit.reset_blink();
        }
        self.had_focus = focused;

        if self.edit.is_dragging() {
            if !ctx.left_down {
                self.edit.end_drag();
            } else {
                let pad = ctx.config.text_padding_x;
                let x = self.content_x(local.x, ctx.coords.scale().x, pad);
                let idx = self.edit.index_for_x(x, ctx.measure, font_size);
                if self.edit.drag_to(idx, ctx.pointer) {
                    self.follow_caret(size, font_size, ctx.measure, pad);
                }
            }
        }

        self.edit
            .tick_blink(ctx.dt, focused, ctx.config.caret_blink_secs);
    }

    pub(crate) fn key(&mut self, ev: &KeyEvent, size: Size, font_size: f32, ctx: &EventCtx) -> bool {
        let (handled, changed) = self.edit.handle_key(ev, ctx.clipboard);
        if handled {
            self.follow_caret(size, font_size, ctx.measure, ctx.config.text_padding_x);
            if changed {
                self.notify();
            }
        }
        handled
    }

    pub(crate) fn text_input(&mut self, text: &str, size: Size, font_size: f32, ctx: &EventCtx) -> bool {
        if !self.edit.insert(text) {
            return false;
        }
        self.follow_caret(size, font_size, ctx.measure, ctx.config.text_padding_x);
        self.notify();
        true
    }

    pub(crate) fn backspace(&mut self, size: Size, font_size: f32, ctx: &EventCtx) -> bool {
        if !self.edit.backspace() {
            return false;
        }
        self.follow_caret(size, font_size, ctx.measure, ctx.config.text_padding_x);
        self.notify();
        true
    }

    fn render_key(&self, font_size: f32) -> TextKey {
        TextKey::editing(
            self.edit.text(),
            font_size,
            self.edit.caret(),
            self.edit.selection_raw(),
        )
    }

    pub(crate) fn draw_background(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        focused: bool,
        font_size: f32,
        padding: f32,
        palette: &Palette,
    ) {
        let border = if focused {
            Border {
                width: 2.0,
                color: palette.focus,
            }
        } else {
            Border {
                width: 1.0,
                color: palette.outline,
            }
        };
        r.draw_rounded_rect(rect.pos(), rect.size(), palette.field_bg, 4.0, Some(border));

        if !self.edit.has_selection() {
            return;
        }
        let (lo, hi) = self.edit.selection();
        let text_x = rect.x + padding - self.edit.scroll_x;
        let x0 = (text_x + r.measure_text_width(self.edit.prefix(lo), font_size)).max(rect.x + padding);
        let x1 = (text_x + r.measure_text_width(self.edit.prefix(hi), font_size))
            .min(rect.x + rect.w - padding);
        if x1 > x0 {
            r.draw_rect(
                Vec2::new(x0, rect.y + CARET_INSET),
                Size::new(x1 - x0, rect.h - 2.0 * CARET_INSET),
                palette.selection,
                1.0,
            );
        }
    }

    pub(crate) fn draw_text(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        cache: &mut TextCache,
        focused: bool,
        font_size: f32,
        padding: f32,
        palette: &Palette,
    ) {
        let text_x = rect.x + padding - self.edit.scroll_x;
        let (key, color) = if self.edit.is_empty() && !focused {
            (TextKey::label(&self.hint, font_size), palette.hint)
        } else {
            (self.render_key(font_size), palette.on_surface)
        };
        if let Some(tex) = cache.resolve(r, key) {
            let x = if self.edit.is_empty() { rect.x + padding } else { text_x };
            let pos = Vec2::new(x, rect.y + (rect.h - tex.height) * 0.5);
            r.draw_texture(tex.handle, pos, tex.size(), color, 1.0);
        }

        if focused && self.edit.caret_visible() {
            let cx = text_x + r.measure_text_width(self.edit.prefix(self.edit.caret()), font_size);
            r.draw_rect(
                Vec2::new(cx, rect.y + CARET_INSET),
                Size::new(CARET_W, (rect.h - 2.0 * CARET_INSET).max(0.0)),
                palette.caret,
                1.0,
            );
        }
    }
}
