use std::rc::Rc;

use sprocket_core::{Border, Key, KeyEvent, Palette, Rect, Renderer, Size, Vec2};

use crate::text_cache::{TextCache, TextKey};

const BOX: f32 = 18.0;
const GAP: f32 = 8.0;

pub struct Checkbox {
    pub label: String,
    pub checked: bool,
    pub on_toggle: Option<Rc<dyn Fn(bool)>>,
}

impl Checkbox {
    pub fn new(label: impl Into<String>, checked: bool, on_toggle: impl Fn(bool) + 'static) -> Self {
        Self {
            label: label.into(),
            checked,
            on_toggle: Some(Rc::new(on_toggle)),
        }
    }

    pub(crate) fn toggle(&mut self) {
        self.checked = !self.checked;
        if let Some(cb) = &self.on_toggle {
            cb(self.checked);
        }
    }

    pub(crate) fn key(&mut self, ev: &KeyEvent) -> bool {
        if ev.key == Key::Space {
            self.toggle();
            return true;
        }
        false
    }

    fn box_rect(rect: Rect) -> Rect {
        let side = BOX.min(rect.h);
        Rect::new(rect.x, rect.y + (rect.h - side) * 0.5, side, side)
    }

    pub(crate) fn draw_background(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        hovered: bool,
        focused: bool,
        palette: &Palette,
    ) {
        let b = Self::box_rect(rect);
        let outline = if focused {
            palette.focus
        } else if hovered {
            palette.on_surface
        } else {
            palette.outline
        };
        r.draw_rounded_rect(
            b.pos(),
            b.size(),
            palette.surface,
            3.0,
            Some(Border {
                width: 2.0,
                color: outline,
            }),
        );
        if self.checked {
            let inset = b.w * 0.25;
            r.draw_rounded_rect(
                Vec2::new(b.x + inset, b.y + inset),
                Size::new(b.w - 2.0 * inset, b.h - 2.0 * inset),
                palette.primary,
                2.0,
                None,
            );
        }
    }

    pub(crate) fn draw_text(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        cache: &mut TextCache,
        font_size: f32,
        palette: &Palette,
    ) {
        let Some(tex) = cache.resolve(r, TextKey::label(&self.label, font_size)) else {
            return;
        };
        let b = Self::box_rect(rect);
        let pos = Vec2::new(b.x + b.w + GAP, rect.y + (rect.h - tex.height) * 0.5);
        r.draw_texture(tex.handle, pos, tex.size(), palette.on_surface, 1.0);
    }
}
