use std::rc::Rc;

use sprocket_core::{Key, KeyEvent, Palette, Rect, Renderer, Size, Vec2};

pub type CallbackF32 = Rc<dyn Fn(f32)>;

const TRACK_H: f32 = 4.0;
const KNOB_D: f32 = 16.0;

/// Horizontal slider over `[0, 1]`.
///
/// A gesture starts on mouse-down (value jumps to the pointer), follows the
/// pointer while the button is held, and reports the final value through
/// `on_change` once, on mouse-up.
pub struct Slider {
    pub value: f32,
    dragging: bool,
    pub on_change: Option<CallbackF32>,
}

impl Slider {
    pub fn new(value: f32, on_change: impl Fn(f32) + 'static) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            dragging: false,
            on_change: Some(Rc::new(on_change)),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn value_at(local_x: f32, device_width: f32) -> f32 {
        if device_width <= 0.0 {
            return 0.0;
        }
        (local_x / device_width).clamp(0.0, 1.0)
    }

    pub(crate) fn press(&mut self, local_x: f32, device_width: f32) {
        self.value = Self::value_at(local_x, device_width);
        self.dragging = true;
    }

    pub(crate) fn drag(&mut self, local_x: f32, device_width: f32, left_down: bool) {
        if self.dragging && left_down {
            self.value = Self::value_at(local_x, device_width);
        }
    }

    pub(crate) fn release(&mut self) -> Option<f32> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.notify();
        Some(self.value)
    }

    pub(crate) fn key(&mut self, ev: &KeyEvent, step: f32) -> bool {
        let delta = match ev.key {
            Key::ArrowLeft => -step,
            Key::ArrowRight => step,
            _ => return false,
        };
        self.value = (self.value + delta).clamp(0.0, 1.0);
        self.notify();
        true
    }

    fn notify(&self) {
        if let Some(cb) = &self.on_change {
            cb(self.value);
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
        let cy = rect.y + rect.h * 0.5;
        let track_pos = Vec2::new(rect.x, cy - TRACK_H * 0.5);
        r.draw_rect(track_pos, Size::new(rect.w, TRACK_H), palette.track, 1.0);
        r.draw_rect(
            track_pos,
            Size::new(rect.w * self.value, TRACK_H),
            palette.primary,
            1.0,
        );

        let knob_x = rect.x + rect.w * self.value - KNOB_D * 0.5;
        let knob = if hovered || self.dragging {
            palette.button_bg_hover
        } else {
            palette.primary
        };
        let border = focused.then_some(sprocket_core::Border {
            width: 2.0,
            color: palette.focus,
        });
        r.draw_rounded_rect(
            Vec2::new(knob_x, cy - KNOB_D * 0.5),
            Size::new(KNOB_D, KNOB_D),
            knob,
            KNOB_D * 0.5,
            border,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn release_reports_once_per_gesture() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut s = Slider::new(0.0, move |v| sink.borrow_mut().push(v));

        s.press(100.0, 200.0);
        assert_eq!(s.value, 0.5);
        s.drag(150.0, 200.0, true);
        s.drag(500.0, 200.0, true);
        assert_eq!(s.value, 1.0);
        assert_eq!(s.release(), Some(1.0));
        assert_eq!(s.release(), None);
        assert_eq!(*seen.borrow(), vec![1.0]);
    }

    #[test]
    fn keys_step_and_clamp() {
        let mut s = Slider::new(0.98, |_| {});
        assert!(s.key(&KeyEvent::plain(Key::ArrowRight), 0.05));
        assert_eq!(s.value, 1.0);
        assert!(!s.key(&KeyEvent::plain(Key::Home), 0.05));
    }
}
