//! # Elements
//!
//! An [`Element`] is the common frame (position, size, z-index, flags) around
//! one widget from the closed [`ElementKind`] set. Positions and sizes are
//! logical and relative to the parent: the window for registry elements, the
//! content origin for children of a [`ScrollContainer`].
//!
//! Hit-testing runs in device space. Every handler receives the pointer in
//! absolute device coordinates together with the device origin of the
//! element's parent and derives element-local positions itself.

use std::rc::Rc;

use sprocket_core::{
    Color, CoordinateSpace, KeyEvent, Rect, Renderer, Size, TextMeasure, TextTexture,
    TextureHandle, UiConfig, Vec2,
};
use web_time::Duration;

use crate::button::Button;
use crate::checkbox::Checkbox;
use crate::clipboard::Clipboard;
use crate::scroll::ScrollContainer;
use crate::slider::Slider;
use crate::text_cache::TextCache;
use crate::textbox::TextBox;

slotmap::new_key_type! {
    /// Handle to an element owned by an [`crate::ElementRegistry`].
    pub struct ElementId;
}

/// Everything an input handler may consult.
#[derive(Clone, Copy)]
pub struct EventCtx<'a> {
    pub coords: &'a CoordinateSpace,
    pub measure: &'a dyn TextMeasure,
    pub clipboard: &'a Clipboard,
    pub config: &'a UiConfig,
    /// Clock reading for this event.
    pub now: Duration,
    /// Pointer position, device space.
    pub pointer: Vec2,
}

/// Per-frame state handed to [`Element::update`].
#[derive(Clone, Copy)]
pub struct UpdateCtx<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    pub pointer: Vec2,
    pub left_down: bool,
    pub coords: &'a CoordinateSpace,
    pub measure: &'a dyn TextMeasure,
    pub config: &'a UiConfig,
}

pub enum ElementKind {
    Button(Button),
    Slider(Slider),
    TextBox(TextBox),
    Checkbox(Checkbox),
    ScrollContainer(ScrollContainer),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Button(_) => "Button",
            ElementKind::Slider(_) => "Slider",
            ElementKind::TextBox(_) => "TextBox",
            ElementKind::Checkbox(_) => "Checkbox",
            ElementKind::ScrollContainer(_) => "ScrollContainer",
        }
    }
}

pub struct Element {
    pub pos: Vec2,
    pub size: Size,
    pub z_index: i32,
    pub visible: bool,
    pub hovered: bool,
    pub focused: bool,
    /// Keyboard focus order; negative excludes the element from Tab cycling.
    pub tab_index: i32,
    /// Extra hit margin around the element, logical units.
    pub hit_padding: f32,
    /// Input passes through to whatever is below.
    pub input_transparent: bool,
    /// Overrides [`UiConfig::font_size`].
    pub font_size: Option<f32>,
    pub kind: ElementKind,
    pub(crate) text_cache: TextCache,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Size::default(),
            z_index: 0,
            visible: true,
            hovered: false,
            focused: false,
            tab_index: -1,
            hit_padding: 0.0,
            input_transparent: false,
            font_size: None,
            kind,
            text_cache: TextCache::default(),
        }
    }

    pub fn button(label: impl Into<String>, on_click: impl Fn() + 'static) -> Self {
        Self::new(ElementKind::Button(Button::new(label, on_click)))
    }

    pub fn slider(value: f32, on_change: impl Fn(f32) + 'static) -> Self {
        Self::new(ElementKind::Slider(Slider::new(value, on_change)))
    }

    pub fn checkbox(label: impl Into<String>, checked: bool, on_toggle: impl Fn(bool) + 'static) -> Self {
        Self::new(ElementKind::Checkbox(Checkbox::new(label, checked, on_toggle)))
    }

    pub fn text_box(tb: TextBox) -> Self {
        Self::new(ElementKind::TextBox(tb))
    }

    pub fn scroll_container() -> Self {
        Self::new(ElementKind::ScrollContainer(ScrollContainer::new()))
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn sized(mut self, w: f32, h: f32) -> Self {
        self.size = Size::new(w, h);
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    pub fn tab_index(mut self, i: i32) -> Self {
        self.tab_index = i;
        self
    }

    pub fn hit_padding(mut self, p: f32) -> Self {
        self.hit_padding = p;
        self
    }

    pub fn transparent(mut self) -> Self {
        self.input_transparent = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_font_size(mut self, px: f32) -> Self {
        self.font_size = Some(px);
        self
    }

    pub fn on_right_click(mut self, f: impl Fn() + 'static) -> Self {
        if let ElementKind::Button(b) = &mut self.kind {
            b.on_right_click = Some(Rc::new(f));
        } else {
            log::warn!("on_right_click ignored on {}", self.kind.name());
        }
        self
    }

    /// Adds a child. Only meaningful on a scroll container.
    pub fn child(mut self, child: Element) -> Self {
        if let ElementKind::ScrollContainer(sc) = &mut self.kind {
            sc.push(child);
        } else {
            log::warn!("child ignored on {}", self.kind.name());
        }
        self
    }

    pub fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            ElementKind::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_slider(&self) -> Option<&Slider> {
        match &self.kind {
            ElementKind::Slider(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<&Checkbox> {
        match &self.kind {
            ElementKind::Checkbox(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text_box(&self) -> Option<&TextBox> {
        match &self.kind {
            ElementKind::TextBox(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match &mut self.kind {
            ElementKind::TextBox(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scroll(&self) -> Option<&ScrollContainer> {
        match &self.kind {
            ElementKind::ScrollContainer(sc) => Some(sc),
            _ => None,
        }
    }

    pub fn as_scroll_mut(&mut self) -> Option<&mut ScrollContainer> {
        match &mut self.kind {
            ElementKind::ScrollContainer(sc) => Some(sc),
            _ => None,
        }
    }

    pub fn is_text_box(&self) -> bool {
        matches!(self.kind, ElementKind::TextBox(_))
    }

    pub fn accepts_input(&self) -> bool {
        self.visible && !self.input_transparent
    }

    fn font(&self, config: &UiConfig) -> f32 {
        self.font_size.unwrap_or(config.font_size)
    }

    /// Logical rect relative to the parent origin.
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn device_pos(&self, origin: Vec2, coords: &CoordinateSpace) -> Vec2 {
        let p = coords.to_device(self.pos);
        Vec2::new(origin.x + p.x, origin.y + p.y)
    }

    /// Padded hit rect, device space.
    pub fn hit_rect(&self, origin: Vec2, coords: &CoordinateSpace) -> Rect {
        coords
            .rect_to_device(self.rect())
            .translate(origin.x, origin.y)
            .inflate(coords.length_to_device(self.hit_padding))
    }

    /// Pre-order traversal including scroll container children.
    pub fn walk(&self, f: &mut dyn FnMut(&Element)) {
        f(self);
        if let ElementKind::ScrollContainer(sc) = &self.kind {
            for c in &sc.children {
                c.walk(f);
            }
        }
    }

    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        if let ElementKind::ScrollContainer(sc) = &mut self.kind {
            for c in &mut sc.children {
                c.walk_mut(f);
            }
        }
    }

    /// Like [`Element::walk_mut`] but skips hidden elements and everything
    /// inside hidden containers.
    pub fn walk_visible_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        if !self.visible {
            return;
        }
        f(self);
        if let ElementKind::ScrollContainer(sc) = &mut self.kind {
            for c in &mut sc.children {
                c.walk_visible_mut(f);
            }
        }
    }

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        match &self.kind {
            ElementKind::ScrollContainer(sc) => sc.children.iter().find_map(|c| c.find(pred)),
            _ => None,
        }
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        match &mut self.kind {
            ElementKind::ScrollContainer(sc) => {
                sc.children.iter_mut().find_map(|c| c.find_mut(pred))
            }
            _ => None,
        }
    }

    /// The element a left press on this one ends up at: the topmost hovered
    /// descendant for containers, the element itself otherwise.
    pub(crate) fn press_target(&self) -> &Element {
        match &self.kind {
            ElementKind::ScrollContainer(sc) => match sc.hovered_child() {
                Some(c) => c.press_target(),
                None => self,
            },
            _ => self,
        }
    }

    /// Sets `hovered` from pure containment; `pointer` is `None` when the
    /// pointer cannot reach this element.
    pub(crate) fn update_hover(&mut self, pointer: Option<Vec2>, origin: Vec2, coords: &CoordinateSpace) {
        let hit = self.accepts_input()
            && pointer.is_some_and(|p| self.hit_rect(origin, coords).contains(p));
        self.hovered = hit;
        let device_pos = self.device_pos(origin, coords);
        if let ElementKind::ScrollContainer(sc) = &mut self.kind {
            let content = sc.content_origin(device_pos, coords);
            let inner = pointer.filter(|_| hit);
            for c in &mut sc.children {
                c.update_hover(inner, content, coords);
            }
        }
    }

    /// Left press. Returns true when a text box received it.
    pub(crate) fn on_mouse_down(&mut self, origin: Vec2, ctx: &EventCtx) -> bool {
        let device_pos = self.device_pos(origin, ctx.coords);
        let local = ctx.pointer.relative_to(device_pos);
        let font = self.font(ctx.config);
        let size = self.size;
        log::trace!("mouse down on {} at local {:?}", self.kind.name(), local);
        match &mut self.kind {
            ElementKind::Button(b) => {
                b.press();
                false
            }
            ElementKind::Slider(s) => {
                s.press(local.x, size.width * ctx.coords.scale().x);
                false
            }
            ElementKind::Checkbox(c) => {
                c.toggle();
                false
            }
            ElementKind::TextBox(t) => {
                self.focused = true;
                t.mouse_down(local, size, font, ctx);
                true
            }
            ElementKind::ScrollContainer(sc) => {
                let content = sc.content_origin(device_pos, ctx.coords);
                match sc.hovered_child_mut() {
                    Some(c) => c.on_mouse_down(content, ctx),
                    None => false,
                }
            }
        }
    }

    pub(crate) fn right_click(&mut self) {
        match &mut self.kind {
            ElementKind::Button(b) => b.right_click(),
            ElementKind::ScrollContainer(sc) => {
                if let Some(c) = sc.hovered_child_mut() {
                    c.right_click();
                }
            }
            _ => {}
        }
    }

    pub(crate) fn on_mouse_up(&mut self) {
        let hovered = self.hovered;
        match &mut self.kind {
            ElementKind::Button(b) => {
                b.release(hovered);
            }
            ElementKind::Slider(s) => {
                s.release();
            }
            ElementKind::TextBox(t) => t.mouse_up(),
            ElementKind::Checkbox(_) => {}
            ElementKind::ScrollContainer(sc) => {
                for c in &mut sc.children {
                    c.on_mouse_up();
                }
            }
        }
    }

    /// Key for the focused element. Tab, Enter-on-text-box and Backspace are
    /// routed before this is reached.
    pub(crate) fn on_key_down(&mut self, ev: &KeyEvent, ctx: &EventCtx) -> bool {
        let font = self.font(ctx.config);
        let size = self.size;
        match &mut self.kind {
            ElementKind::Button(b) => b.key(ev),
            ElementKind::Slider(s) => s.key(ev, ctx.config.slider_key_step),
            ElementKind::Checkbox(c) => c.key(ev),
            ElementKind::TextBox(t) => t.key(ev, size, font, ctx),
            ElementKind::ScrollContainer(_) => false,
        }
    }

    pub(crate) fn on_text_input(&mut self, text: &str, ctx: &EventCtx) -> bool {
        let font = self.font(ctx.config);
        let size = self.size;
        match &mut self.kind {
            ElementKind::TextBox(t) => t.text_input(text, size, font, ctx),
            _ => false,
        }
    }

    pub(crate) fn on_backspace(&mut self, ctx: &EventCtx) -> bool {
        let font = self.font(ctx.config);
        let size = self.size;
        match &mut self.kind {
            ElementKind::TextBox(t) => t.backspace(size, font, ctx),
            _ => false,
        }
    }

    /// Wheel delta in logical units. Returns what was not consumed.
    pub(crate) fn on_wheel(&mut self, dy: f32) -> f32 {
        let height = self.size.height;
        match &mut self.kind {
            ElementKind::ScrollContainer(sc) => {
                let rest = match sc.hovered_child_mut() {
                    Some(c) => c.on_wheel(dy),
                    None => dy,
                };
                if rest == 0.0 {
                    return 0.0;
                }
                sc.scroll_immediate(rest, height)
            }
            _ => dy,
        }
    }

    pub(crate) fn update(&mut self, origin: Vec2, ctx: &UpdateCtx) {
        if !self.visible {
            // hidden elements give up focus and any drag in progress
            self.walk_mut(&mut |e: &mut Element| {
                e.focused = false;
                if let ElementKind::TextBox(t) = &mut e.kind {
                    t.mouse_up();
                }
            });
            return;
        }
        let device_pos = self.device_pos(origin, ctx.coords);
        let local = ctx.pointer.relative_to(device_pos);
        let font = self.font(ctx.config);
        let size = self.size;
        let focused = self.focused;
        match &mut self.kind {
            ElementKind::Slider(s) => s.drag(local.x, size.width * ctx.coords.scale().x, ctx.left_down),
            ElementKind::TextBox(t) => t.update(local, size, font, focused, ctx),
            ElementKind::ScrollContainer(sc) => {
                sc.clamp_scroll(size.height);
                let content = sc.content_origin(device_pos, ctx.coords);
                for c in &mut sc.children {
                    c.update(content, ctx);
                }
            }
            ElementKind::Button(_) | ElementKind::Checkbox(_) => {}
        }
    }

    /// Draws the element at `origin` (logical, the parent's content origin).
    pub(crate) fn draw(&mut self, r: &mut dyn Renderer, origin: Vec2, config: &UiConfig) {
        if !self.visible {
            return;
        }
        let rect = self.rect().translate(origin.x, origin.y);
        let font = self.font(config);
        let pal = &config.palette;
        let (hovered, focused) = (self.hovered, self.focused);
        match &mut self.kind {
            ElementKind::Button(b) => {
                b.draw_background(r, rect, hovered, focused, pal);
                b.draw_text(r, rect, &mut self.text_cache, font, pal);
            }
            ElementKind::Slider(s) => s.draw_background(r, rect, hovered, focused, pal),
            ElementKind::Checkbox(c) => {
                c.draw_background(r, rect, hovered, focused, pal);
                c.draw_text(r, rect, &mut self.text_cache, font, pal);
            }
            ElementKind::TextBox(t) => {
                let pad = config.text_padding_x;
                t.draw_background(r, rect, focused, font, pad, pal);
                t.draw_text(r, rect, &mut self.text_cache, focused, font, pad, pal);
            }
            ElementKind::ScrollContainer(sc) => {
                r.draw_rounded_rect(rect.pos(), rect.size(), pal.surface, 0.0, None);
                let content = Vec2::new(rect.x, rect.y - sc.scroll_y);
                for c in &mut sc.children {
                    let top = content.y + c.pos.y;
                    // no clip primitive; skip children wholly outside the viewport
                    if top + c.size.height < rect.y || top > rect.y + rect.h {
                        continue;
                    }
                    c.draw(r, content, config);
                }
            }
        }
    }

    /// Queues every owned texture (this element and its children) for
    /// release and forgets the cached keys.
    pub(crate) fn release_textures(&mut self, releases: &mut Vec<TextureHandle>) {
        self.walk_mut(&mut |e: &mut Element| e.text_cache.reset(releases));
    }
}

/// Draws `tex` centered in `rect`.
pub(crate) fn draw_centered(r: &mut dyn Renderer, tex: TextTexture, rect: Rect, color: Color) {
    let pos = Vec2::new(
        rect.x + (rect.w - tex.width) * 0.5,
        rect.y + (rect.h - tex.height) * 0.5,
    );
    r.draw_texture(tex.handle, pos, tex.size(), color, 1.0);
}
