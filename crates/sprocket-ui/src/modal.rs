//! # Modal dialogs
//!
//! A Yes/No confirmation box. While a dialog is active it is the only
//! receiver of pointer input; keyboard and text input keep going to the
//! focused element.
//!
//! Dialog state lives in a shared slot so that it can be driven from inside
//! callbacks. [`ModalHandle`] is the cloneable front door to that slot: the
//! host keeps one, and a dialog callback may capture one to chain another
//! dialog. The slot is never borrowed while a callback runs.

use std::cell::RefCell;
use std::rc::Rc;

use sprocket_core::{ModalReplace, Palette, Rect, Renderer, Size, TextureHandle, UiConfig, Vec2};

use crate::element::{Element, EventCtx, draw_centered};
use crate::text_cache::{TextCache, TextKey};

pub type DialogCallback = Box<dyn FnOnce(bool)>;

pub const MODAL_MAX_W: f32 = 600.0;
pub const MODAL_H: f32 = 160.0;
pub const MODAL_BUTTON_W: f32 = 120.0;
pub const MODAL_BUTTON_H: f32 = 40.0;
pub const MODAL_BUTTON_GAP: f32 = 20.0;
pub const MODAL_MARGIN: f32 = 20.0;

#[derive(Default)]
struct DialogSlot {
    active: bool,
    message: String,
    callback: Option<DialogCallback>,
    replace: ModalReplace,
    layout_dirty: bool,
    /// Set by `show`; the controller resets button and texture state once.
    fresh: bool,
}

#[derive(Clone, Default)]
pub struct ModalHandle {
    slot: Rc<RefCell<DialogSlot>>,
}

impl ModalHandle {
    /// Shows `message` and arms `callback` with the answer. If a dialog is
    /// already waiting, its callback is handled per [`ModalReplace`].
    pub fn show_dialog(&self, message: impl Into<String>, callback: impl FnOnce(bool) + 'static) {
        let message = message.into();
        let previous = {
            let mut s = self.slot.borrow_mut();
            match (s.callback.take(), s.replace) {
                (Some(_), ModalReplace::DropPrevious) => {
                    log::warn!("dialog replaced before it was answered; previous callback dropped");
                    None
                }
                (prev, _) => prev,
            }
        };
        if let Some(prev) = previous {
            log::debug!("dialog replaced; cancelling previous");
            prev(false);
        }

        let mut s = self.slot.borrow_mut();
        s.active = true;
        s.message = message;
        s.callback = Some(Box::new(callback));
        s.layout_dirty = true;
        s.fresh = true;
        log::debug!("dialog shown: {:?}", s.message);
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().active
    }

    pub fn message(&self) -> String {
        self.slot.borrow().message.clone()
    }

    /// Answers the active dialog as if a button had been clicked.
    pub fn answer(&self, yes: bool) {
        let cb = {
            let mut s = self.slot.borrow_mut();
            if !s.active {
                return;
            }
            s.active = false;
            s.callback.take()
        };
        log::debug!("dialog answered: {}", if yes { "yes" } else { "no" });
        if let Some(cb) = cb {
            cb(yes);
        }
    }

    fn set_replace_policy(&self, replace: ModalReplace) {
        self.slot.borrow_mut().replace = replace;
    }
}

pub struct ModalController {
    handle: ModalHandle,
    yes: Element,
    no: Element,
    box_rect: Rect,
    message_cache: TextCache,
}

impl ModalController {
    pub fn new(config: &UiConfig) -> Self {
        let handle = ModalHandle::default();
        handle.set_replace_policy(config.modal_replace);
        let button = |label: &str, answer: bool| {
            let h = handle.clone();
            Element::button(label, move || h.answer(answer))
                .sized(MODAL_BUTTON_W, MODAL_BUTTON_H)
                .z(i32::MAX)
        };
        let yes = button("Yes", true);
        let no = button("No", false);
        Self {
            handle,
            yes,
            no,
            box_rect: Rect::default(),
            message_cache: TextCache::default(),
        }
    }

    pub fn handle(&self) -> ModalHandle {
        self.handle.clone()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn show_dialog(&self, message: impl Into<String>, callback: impl FnOnce(bool) + 'static) {
        self.handle.show_dialog(message, callback);
    }

    pub fn set_config(&mut self, config: &UiConfig) {
        self.handle.set_replace_policy(config.modal_replace);
    }

    pub fn mark_layout_dirty(&self) {
        self.handle.slot.borrow_mut().layout_dirty = true;
    }

    /// Logical rect of the dialog box, as of the last layout.
    pub fn box_rect(&self) -> Rect {
        self.box_rect
    }

    pub fn buttons(&self) -> [&Element; 2] {
        [&self.yes, &self.no]
    }

    /// Recomputes geometry if the slot says so. Returns true if it did.
    fn layout(&mut self, window: Size, releases: &mut Vec<TextureHandle>) -> bool {
        let fresh = {
            let mut s = self.handle.slot.borrow_mut();
            if !s.layout_dirty {
                return false;
            }
            s.layout_dirty = false;
            std::mem::take(&mut s.fresh)
        };
        if fresh {
            self.message_cache.reset(releases);
            for b in [&mut self.yes, &mut self.no] {
                b.hovered = false;
                if let crate::ElementKind::Button(btn) = &mut b.kind {
                    btn.pressed = false;
                }
            }
        }

        let w = MODAL_MAX_W.min(window.width * 0.8);
        self.box_rect = Rect::new(
            (window.width - w) * 0.5,
            (window.height - MODAL_H) * 0.5,
            w,
            MODAL_H,
        );
        let total = 2.0 * MODAL_BUTTON_W + MODAL_BUTTON_GAP;
        let x0 = self.box_rect.x + (w - total) * 0.5;
        let y = self.box_rect.y + MODAL_H - MODAL_MARGIN - MODAL_BUTTON_H;
        self.yes.pos = Vec2::new(x0, y);
        self.no.pos = Vec2::new(x0 + MODAL_BUTTON_W + MODAL_BUTTON_GAP, y);
        log::trace!("dialog layout {:?}", self.box_rect);
        true
    }

    /// Exclusive pointer handling while active.
    pub(crate) fn process_pointer(
        &mut self,
        pressed: bool,
        released: bool,
        ctx: &EventCtx,
        releases: &mut Vec<TextureHandle>,
    ) {
        self.layout(ctx.coords.window_size(), releases);
        for b in [&mut self.yes, &mut self.no] {
            b.update_hover(Some(ctx.pointer), Vec2::ZERO, ctx.coords);
        }
        if pressed && let Some(b) = [&mut self.yes, &mut self.no].into_iter().find(|b| b.hovered) {
            b.on_mouse_down(Vec2::ZERO, ctx);
        }
        if released {
            // either release may answer and deactivate; both still see mouse-up
            self.yes.on_mouse_up();
            self.no.on_mouse_up();
        }
    }

    pub(crate) fn reset_text_caches(&mut self, releases: &mut Vec<TextureHandle>) {
        self.message_cache.reset(releases);
        self.yes.release_textures(releases);
        self.no.release_textures(releases);
        self.mark_layout_dirty();
    }

    pub(crate) fn draw(&mut self, r: &mut dyn Renderer, config: &UiConfig, window: Size, releases: &mut Vec<TextureHandle>) {
        if !self.is_active() {
            return;
        }
        self.layout(window, releases);
        let pal: &Palette = &config.palette;
        r.draw_rect(Vec2::ZERO, window, pal.scrim, 1.0);
        r.draw_rounded_rect(self.box_rect.pos(), self.box_rect.size(), pal.surface, 8.0, None);

        let message = self.handle.message();
        let text_area = Rect::new(
            self.box_rect.x + MODAL_MARGIN,
            self.box_rect.y + MODAL_MARGIN,
            (self.box_rect.w - 2.0 * MODAL_MARGIN).max(0.0),
            MODAL_H - 3.0 * MODAL_MARGIN - MODAL_BUTTON_H,
        );
        if let Some(tex) = self.message_cache.resolve(r, TextKey::label(&message, config.font_size)) {
            draw_centered(r, tex, text_area, pal.on_surface);
        }
        self.yes.draw(r, Vec2::ZERO, config);
        self.no.draw(r, Vec2::ZERO, config);
    }
}
