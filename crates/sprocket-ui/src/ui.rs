//! # The `Ui` facade
//!
//! `Ui` owns the registry and every controller and exposes the per-frame
//! entry points a host calls, in this order:
//!
//! ```text
//! set_viewport (on resize)
//! process_mouse / process_wheel / handle_key_down / handle_text_input
//! update(dt)
//! render(renderer)
//! ```
//!
//! Texture releases are queued wherever they arise (element removal,
//! viewport changes, expired notifications) and handed to the renderer at the
//! start of the next `render`.

use sprocket_core::{
    Clock, CoordinateSpace, Key, KeyEvent, Renderer, SystemClock, TextMeasure, TextureHandle,
    UiConfig, Vec2,
};

use crate::clipboard::Clipboard;
use crate::element::{Element, ElementId, EventCtx, UpdateCtx};
use crate::focus::FocusManager;
use crate::modal::{ModalController, ModalHandle};
use crate::overlay::{TimedText, TimedTextOverlay};
use crate::registry::ElementRegistry;
use crate::router::{InputRouter, MouseOutcome};

pub struct Ui {
    coords: CoordinateSpace,
    registry: ElementRegistry,
    router: InputRouter,
    focus: FocusManager,
    modal: ModalController,
    overlay: TimedTextOverlay,
    clipboard: Clipboard,
    config: UiConfig,
    clock: Box<dyn Clock>,
    measure: Box<dyn TextMeasure>,
    releases: Vec<TextureHandle>,
}

impl Ui {
    /// `measure` must agree with the renderer's own text measurement; it is
    /// used for caret hit-testing during input, outside of `render`.
    pub fn new(measure: impl TextMeasure + 'static) -> Self {
        let config = UiConfig::default();
        Self {
            coords: CoordinateSpace::default(),
            registry: ElementRegistry::new(),
            router: InputRouter::new(),
            focus: FocusManager::new(),
            modal: ModalController::new(&config),
            overlay: TimedTextOverlay::default(),
            clipboard: Clipboard::new(),
            config,
            clock: Box::new(SystemClock::new()),
            measure: Box::new(measure),
            releases: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.modal.set_config(&config);
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn coords(&self) -> &CoordinateSpace {
        &self.coords
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn overlay(&self) -> &TimedTextOverlay {
        &self.overlay
    }

    /// Last pointer position in logical units.
    pub fn pointer(&self) -> Vec2 {
        self.coords.to_logical(self.router.pointer())
    }

    /// Handles queued for release but not yet handed to a renderer.
    pub fn pending_releases(&self) -> &[TextureHandle] {
        &self.releases
    }

    /// Updates the viewport. On a real change every cached text texture is
    /// dropped (they were rasterized for the old scale) and the dialog is
    /// laid out again.
    pub fn set_viewport(&mut self, window_w: f32, window_h: f32, device_w: f32, device_h: f32) -> bool {
        if !self.coords.set_viewport(window_w, window_h, device_w, device_h) {
            return false;
        }
        self.registry.release_all_textures(&mut self.releases);
        self.modal.reset_text_caches(&mut self.releases);
        self.overlay.reset_text_caches(&mut self.releases);
        true
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        self.registry.add(element)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.registry.remove(id, &mut self.releases)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.registry.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.registry.get_mut(id)
    }

    pub fn focused(&self) -> Option<&Element> {
        self.registry.find(&|e| e.focused)
    }

    pub fn process_mouse(&mut self, pos: Vec2, left_down: bool, right_down: bool) -> MouseOutcome {
        let ctx = EventCtx {
            coords: &self.coords,
            measure: &*self.measure,
            clipboard: &self.clipboard,
            config: &self.config,
            now: self.clock.elapsed(),
            pointer: Vec2::ZERO,
        };
        self.router.process_mouse(
            &mut self.registry,
            &mut self.modal,
            pos,
            left_down,
            right_down,
            ctx,
            &mut self.releases,
        )
    }

    pub fn process_wheel(&mut self, pos: Vec2, delta_y: f32) -> bool {
        let ctx = EventCtx {
            coords: &self.coords,
            measure: &*self.measure,
            clipboard: &self.clipboard,
            config: &self.config,
            now: self.clock.elapsed(),
            pointer: Vec2::ZERO,
        };
        self.router
            .process_wheel(&mut self.registry, &self.modal, pos, delta_y, ctx)
    }

    /// Key routing: Tab cycles focus; Enter defocuses a focused text box;
    /// Backspace edits a focused text box; anything else goes to the focused
    /// element. Returns true if something handled the key.
    pub fn handle_key_down(&mut self, ev: KeyEvent) -> bool {
        if ev.key == Key::Tab {
            self.focus
                .cycle_focus(&mut self.registry, ev.modifiers.shift());
            return true;
        }

        let ctx = EventCtx {
            coords: &self.coords,
            measure: &*self.measure,
            clipboard: &self.clipboard,
            config: &self.config,
            now: self.clock.elapsed(),
            pointer: self.router.pointer(),
        };
        let Some(focused) = self.registry.find_mut(&|e| e.focused && e.visible) else {
            return false;
        };

        if focused.is_text_box() {
            match ev.key {
                Key::Enter => {
                    focused.focused = false;
                    log::debug!("text box defocused by Enter");
                    return true;
                }
                Key::Backspace => {
                    focused.on_backspace(&ctx);
                    return true;
                }
                _ => {}
            }
        }
        focused.on_key_down(&ev, &ctx)
    }

    /// Typed text for the focused text box. Control characters are dropped.
    pub fn handle_text_input(&mut self, text: &str) -> bool {
        let ctx = EventCtx {
            coords: &self.coords,
            measure: &*self.measure,
            clipboard: &self.clipboard,
            config: &self.config,
            now: self.clock.elapsed(),
            pointer: self.router.pointer(),
        };
        self.registry
            .find_mut(&|e| e.focused && e.visible && e.is_text_box())
            .is_some_and(|e| e.on_text_input(text, &ctx))
    }

    /// Per-frame tick: drags, caret blink, notification countdowns.
    pub fn update(&mut self, dt: f32) {
        let ctx = UpdateCtx {
            dt,
            pointer: self.router.pointer(),
            left_down: self.router.left_down(),
            coords: &self.coords,
            measure: &*self.measure,
            config: &self.config,
        };
        for &id in self.registry.ids().to_vec().iter() {
            if let Some(e) = self.registry.get_mut(id) {
                e.update(Vec2::ZERO, &ctx);
            }
        }
        self.overlay.update(dt, &mut self.releases);
    }

    pub fn render(&mut self, r: &mut dyn Renderer) {
        for h in self.releases.drain(..) {
            r.release_texture(h);
        }
        for &id in self.registry.ids().to_vec().iter() {
            if let Some(e) = self.registry.get_mut(id) {
                e.draw(r, Vec2::ZERO, &self.config);
            }
        }
        let window = self.coords.window_size();
        self.modal
            .draw(r, &self.config, window, &mut self.releases);
        self.overlay.draw(r);
        // anything queued while drawing (a replaced dialog message) goes now
        for h in self.releases.drain(..) {
            r.release_texture(h);
        }
    }

    pub fn show_dialog(&self, message: impl Into<String>, callback: impl FnOnce(bool) + 'static) {
        self.modal.show_dialog(message, callback);
    }

    pub fn modal_handle(&self) -> ModalHandle {
        self.modal.handle()
    }

    /// Shows `text` at `pos` (logical) for `lifetime_ms`.
    pub fn notify(&mut self, text: impl Into<String>, pos: Vec2, lifetime_ms: f32) {
        let entry = TimedText::new(text, pos, self.config.font_size, lifetime_ms)
            .color(self.config.palette.on_surface);
        self.overlay.push(entry);
    }

    pub fn push_timed_text(&mut self, entry: TimedText) {
        self.overlay.push(entry);
    }
}
