//! Platform runner (desktop via winit).
//!
//! The runner owns the window and translates winit events into [`Ui`] calls.
//! Drawing is delegated to a host-supplied [`WindowRenderer`], created once
//! the window exists:
//!
//! ```rust,no_run
//! # use sprocket_platform::*;
//! # fn make(_w: std::sync::Arc<winit::window::Window>) -> sprocket_core::Result<MyRenderer> { todo!() }
//! # struct MyRenderer;
//! # impl sprocket_core::TextMeasure for MyRenderer { fn measure_text_width(&self, _: &str, _: f32) -> f32 { 0.0 } }
//! # impl sprocket_core::Renderer for MyRenderer {
//! #     fn draw_rect(&mut self, _: sprocket_core::Vec2, _: sprocket_core::Size, _: sprocket_core::Color, _: f32) {}
//! #     fn draw_rounded_rect(&mut self, _: sprocket_core::Vec2, _: sprocket_core::Size, _: sprocket_core::Color, _: f32, _: Option<sprocket_core::Border>) {}
//! #     fn draw_texture(&mut self, _: sprocket_core::TextureHandle, _: sprocket_core::Vec2, _: sprocket_core::Size, _: sprocket_core::Color, _: f32) {}
//! #     fn create_text_texture(&mut self, _: &str, _: f32, _: Option<sprocket_core::TextureHandle>) -> sprocket_core::TextTexture { todo!() }
//! #     fn release_texture(&mut self, _: sprocket_core::TextureHandle) {}
//! # }
//! # impl WindowRenderer for MyRenderer { fn present(&mut self) -> sprocket_core::Result<()> { Ok(()) } }
//! use sprocket_ui::{Element, Ui};
//!
//! env_logger::init();
//! let mut ui = Ui::new(sprocket_core::MonospaceMeasure::default());
//! ui.add(Element::button("Quit", || std::process::exit(0)).at(20.0, 20.0).sized(120.0, 40.0));
//! run_desktop_app(ui, AppOptions::default(), make, |_ui, _dt| {}).unwrap();
//! ```

use sprocket_core::{Key, Modifiers, Renderer};

#[cfg(feature = "desktop")]
use winit::keyboard::{KeyCode, ModifiersState};

/// A [`Renderer`] bound to a window surface.
pub trait WindowRenderer: Renderer {
    /// Framebuffer size changed, physical pixels.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Submits everything drawn since the last call.
    fn present(&mut self) -> sprocket_core::Result<()>;
}

#[derive(Clone, Debug)]
pub struct AppOptions {
    pub title: String,
    /// Initial inner size, logical units.
    pub width: f64,
    pub height: f64,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            title: "Sprocket".into(),
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[cfg(feature = "desktop")]
const LETTERS: [(KeyCode, char); 26] = [
    (KeyCode::KeyA, 'a'),
    (KeyCode::KeyB, 'b'),
    (KeyCode::KeyC, 'c'),
    (KeyCode::KeyD, 'd'),
    (KeyCode::KeyE, 'e'),
    (KeyCode::KeyF, 'f'),
    (KeyCode::KeyG, 'g'),
    (KeyCode::KeyH, 'h'),
    (KeyCode::KeyI, 'i'),
    (KeyCode::KeyJ, 'j'),
    (KeyCode::KeyK, 'k'),
    (KeyCode::KeyL, 'l'),
    (KeyCode::KeyM, 'm'),
    (KeyCode::KeyN, 'n'),
    (KeyCode::KeyO, 'o'),
    (KeyCode::KeyP, 'p'),
    (KeyCode::KeyQ, 'q'),
    (KeyCode::KeyR, 'r'),
    (KeyCode::KeyS, 's'),
    (KeyCode::KeyT, 't'),
    (KeyCode::KeyU, 'u'),
    (KeyCode::KeyV, 'v'),
    (KeyCode::KeyW, 'w'),
    (KeyCode::KeyX, 'x'),
    (KeyCode::KeyY, 'y'),
    (KeyCode::KeyZ, 'z'),
];

/// Physical key to widget key. Unmapped keys yield `None`.
#[cfg(feature = "desktop")]
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Space => Key::Space,
        other => {
            return LETTERS
                .iter()
                .find(|(k, _)| *k == other)
                .map(|&(_, c)| Key::Character(c));
        }
    };
    Some(key)
}

#[cfg(feature = "desktop")]
pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    let mut m = Modifiers::empty();
    m.set(Modifiers::SHIFT, state.shift_key());
    m.set(Modifiers::CONTROL, state.control_key());
    m
}

/// Wheel notch in logical units.
pub const LINE_HEIGHT: f32 = 40.0;

#[cfg(feature = "desktop")]
pub fn run_desktop_app<R, F, U>(
    ui: sprocket_ui::Ui,
    options: AppOptions,
    make_renderer: F,
    on_frame: U,
) -> anyhow::Result<()>
where
    R: WindowRenderer + 'static,
    F: FnMut(std::sync::Arc<winit::window::Window>) -> sprocket_core::Result<R> + 'static,
    U: FnMut(&mut sprocket_ui::Ui, f32) + 'static,
{
    use std::sync::Arc;

    use sprocket_core::{KeyEvent, Vec2};
    use sprocket_ui::Ui;
    use web_time::Instant;
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, Ime, MouseButton, MouseScrollDelta, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::PhysicalKey;
    use winit::window::{Window, WindowAttributes, WindowId};

    struct App<R, F, U> {
        ui: Ui,
        options: AppOptions,
        make_renderer: F,
        on_frame: U,
        window: Option<Arc<Window>>,
        renderer: Option<R>,
        inspector: sprocket_devtools::Inspector,
        modifiers: Modifiers,
        cursor: Vec2,
        left: bool,
        right: bool,
        last_frame: Instant,
    }

    impl<R, F, U> App<R, F, U>
    where
        R: WindowRenderer,
        F: FnMut(Arc<Window>) -> sprocket_core::Result<R>,
        U: FnMut(&mut Ui, f32),
    {
        fn request_redraw(&self) {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }

        fn sync_viewport(&mut self) {
            let Some(w) = &self.window else { return };
            let size = w.inner_size();
            let sf = w.scale_factor() as f32;
            let (dw, dh) = (size.width as f32, size.height as f32);
            self.ui.set_viewport(dw / sf, dh / sf, dw, dh);
            if let Some(r) = &mut self.renderer {
                r.resize(size.width, size.height);
            }
        }

        fn pointer(&mut self) {
            self.ui.process_mouse(self.cursor, self.left, self.right);
            self.request_redraw();
        }

        fn redraw(&mut self) {
            let Some(r) = self.renderer.as_mut() else { return };
            let now = Instant::now();
            let dt = (now - self.last_frame).as_secs_f32();
            self.last_frame = now;

            (self.on_frame)(&mut self.ui, dt);
            self.ui.update(dt);
            let update_ms = (Instant::now() - now).as_secs_f32() * 1000.0;

            self.ui.render(r);
            self.inspector.frame(&self.ui, r, now, update_ms);
            if let Err(e) = r.present() {
                log::error!("present failed: {e}");
            }
        }
    }

    impl<R, F, U> ApplicationHandler<()> for App<R, F, U>
    where
        R: WindowRenderer,
        F: FnMut(Arc<Window>) -> sprocket_core::Result<R>,
        U: FnMut(&mut Ui, f32),
    {
        fn resumed(&mut self, el: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            let attrs = WindowAttributes::default()
                .with_title(self.options.title.clone())
                .with_inner_size(LogicalSize::new(self.options.width, self.options.height));
            let win = match el.create_window(attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {e:?}");
                    el.exit();
                    return;
                }
            };
            match (self.make_renderer)(win.clone()) {
                Ok(r) => {
                    self.renderer = Some(r);
                    win.set_ime_allowed(true);
                    self.window = Some(win);
                    self.sync_viewport();
                    self.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to create renderer: {e}");
                    el.exit();
                }
            }
        }

        fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Window close requested");
                    el.exit();
                }
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    self.sync_viewport();
                    self.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let sf = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                    self.cursor = Vec2::new((position.x / sf) as f32, (position.y / sf) as f32);
                    self.pointer();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let down = state == ElementState::Pressed;
                    match button {
                        MouseButton::Left => self.left = down,
                        MouseButton::Right => self.right = down,
                        _ => return,
                    }
                    self.pointer();
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let sf = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                    let dy = match delta {
                        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                        MouseScrollDelta::PixelDelta(p) => -(p.y / sf) as f32,
                    };
                    log::trace!("wheel dy={dy}");
                    if self.ui.process_wheel(self.cursor, dy) {
                        self.request_redraw();
                    }
                }
                WindowEvent::ModifiersChanged(m) => {
                    self.modifiers = map_modifiers(m.state());
                }
                WindowEvent::KeyboardInput { event: key_event, .. } => {
                    if key_event.state != ElementState::Pressed {
                        return;
                    }
                    let PhysicalKey::Code(code) = key_event.physical_key else {
                        return;
                    };
                    // Inspector hotkey: Ctrl+Shift+I
                    if code == KeyCode::KeyI && self.modifiers.ctrl() && self.modifiers.shift() {
                        self.inspector.hud.toggle_inspector();
                        self.request_redraw();
                        return;
                    }
                    if let Some(key) = map_key(code) {
                        self.ui.handle_key_down(KeyEvent::new(key, self.modifiers));
                    }
                    if !self.modifiers.ctrl()
                        && let Some(text) = key_event.text.as_deref()
                    {
                        self.ui.handle_text_input(text);
                    }
                    self.request_redraw();
                }
                WindowEvent::Ime(Ime::Commit(text)) => {
                    self.ui.handle_text_input(&text);
                    self.request_redraw();
                }
                WindowEvent::RedrawRequested => self.redraw(),
                _ => {}
            }
        }

        fn about_to_wait(&mut self, _el: &ActiveEventLoop) {
            self.request_redraw();
        }
    }

    let event_loop = EventLoop::new()?;
    let mut app = App {
        ui,
        options,
        make_renderer,
        on_frame,
        window: None,
        renderer: None,
        inspector: sprocket_devtools::Inspector::new(),
        modifiers: Modifiers::empty(),
        cursor: Vec2::ZERO,
        left: false,
        right: false,
        last_frame: Instant::now(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(all(test, feature = "desktop"))]
mod tests {
    use super::*;

    #[test]
    fn letters_and_named_keys_map() {
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::Character('a')));
        assert_eq!(map_key(KeyCode::KeyZ), Some(Key::Character('z')));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::ArrowLeft));
        assert_eq!(map_key(KeyCode::F5), None);
    }

    #[test]
    fn modifiers_keep_shift_and_control_only() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL | ModifiersState::ALT);
        assert_eq!(m, Modifiers::SHIFT | Modifiers::CONTROL);
        assert_eq!(map_modifiers(ModifiersState::empty()), Modifiers::empty());
    }
}
