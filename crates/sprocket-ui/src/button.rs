use std::rc::Rc;

use sprocket_core::{Border, Key, KeyEvent, Palette, Rect, Renderer};

use crate::text_cache::{TextCache, TextKey};

pub type Callback = Rc<dyn Fn()>;

pub const BUTTON_RADIUS: f32 = 6.0;

pub struct Button {
    pub label: String,
    pub pressed: bool,
    pub on_click: Option<Callback>,
    pub on_right_click: Option<Callback>,
}

impl Button {
    pub fn new(label: impl Into<String>, on_click: impl Fn() + 'static) -> Self {
        Self {
            label: label.into(),
            pressed: false,
            on_click: Some(Rc::new(on_click)),
            on_right_click: None,
        }
    }

    pub(crate) fn press(&mut self) {
        self.pressed = true;
    }

    /// Ends a press; the click fires only if the pointer is still over the button.
    pub(crate) fn release(&mut self, hovered: bool) -> bool {
        let fire = self.pressed && hovered;
        self.pressed = false;
        if fire {
            self.activate();
        }
        fire
    }

    pub(crate) fn activate(&self) {
        if let Some(cb) = &self.on_click {
            cb();
        }
    }

    pub(crate) fn right_click(&self) {
        if let Some(cb) = &self.on_right_click {
            cb();
        }
    }

    pub(crate) fn key(&self, ev: &KeyEvent) -> bool {
        match ev.key {
            Key::Space | Key::Enter => {
                self.activate();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn draw_background(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        hovered: bool,
        focused: bool,
        palette: &Palette,
    ) {
        let bg = if self.pressed {
            palette.button_bg_pressed
        } else if hovered {
            palette.button_bg_hover
        } else {
            palette.button_bg
        };
        let border = focused.then_some(Border {
            width: 2.0,
            color: palette.focus,
        });
        r.draw_rounded_rect(rect.pos(), rect.size(), bg, BUTTON_RADIUS, border);
    }

    pub(crate) fn draw_text(
        &self,
        r: &mut dyn Renderer,
        rect: Rect,
        cache: &mut TextCache,
        font_size: f32,
        palette: &Palette,
    ) {
        if let Some(tex) = cache.resolve(r, TextKey::label(&self.label, font_size)) {
            crate::element::draw_centered(r, tex, rect, palette.on_primary);
        }
    }
}
