use web_time::Instant;

use sprocket_core::{Border, Color, Rect, Renderer, Vec2};
use sprocket_ui::{Element, TextCache, TextKey, Ui};

const HUD_FONT: f32 = 14.0;

pub struct Hud {
    pub inspector_enabled: bool,
    pub hovered: Option<Rect>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<Metrics>,
    text: TextCache,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
            text: TextCache::default(),
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
        log::debug!("inspector {}", if self.inspector_enabled { "on" } else { "off" });
    }

    pub fn set_hovered(&mut self, r: Option<Rect>) {
        self.hovered = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Counts a frame presented at `now` and folds its rate into the EMA.
    pub fn tick(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    pub fn status_line(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("update: {:.2} ms", m.update_ms));
            lines.push(format!("elements: {}", m.elements));
            if let Some(kind) = m.hovered_kind {
                lines.push(format!("hover: {kind}"));
            }
        }
        lines.join("  |  ")
    }

    pub fn overlay(&mut self, r: &mut dyn Renderer) {
        let line = self.status_line();
        if let Some(tex) = self.text.resolve(r, TextKey::label(&line, HUD_FONT)) {
            r.draw_texture(
                tex.handle,
                Vec2::new(8.0, 8.0),
                tex.size(),
                Color::from_hex("#AAAAAA"),
                1.0,
            );
        }

        if let Some(rect) = self.hovered {
            r.draw_rounded_rect(
                rect.pos(),
                rect.size(),
                Color::TRANSPARENT,
                0.0,
                Some(Border {
                    width: 2.0,
                    color: Color::from_hex("#44AAFF"),
                }),
            );
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub update_ms: f32,
    pub elements: usize,
    pub hovered_kind: Option<&'static str>,
}

/// Logical rect and kind of the topmost hovered element, descending into
/// scroll containers.
pub fn hovered_element(ui: &Ui) -> Option<(Rect, &'static str)> {
    fn deepest(e: &Element, origin: Vec2) -> (Rect, &'static str) {
        let rect = e.rect().translate(origin.x, origin.y);
        if let Some(sc) = e.as_scroll() {
            let content = Vec2::new(rect.x, rect.y - sc.scroll_y);
            if let Some(c) = sc
                .children
                .iter()
                .rev()
                .find(|c| c.accepts_input() && c.hovered)
            {
                return deepest(c, content);
            }
        }
        (rect, e.kind.name())
    }

    ui.registry()
        .iter()
        .rev()
        .find(|(_, e)| e.accepts_input() && e.hovered)
        .map(|(_, e)| deepest(e, Vec2::ZERO))
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    /// Draws the HUD for this frame if enabled. Call after `Ui::render`.
    pub fn frame(&mut self, ui: &Ui, r: &mut dyn Renderer, now: Instant, update_ms: f32) {
        if !self.hud.inspector_enabled {
            return;
        }
        self.hud.tick(now);
        let hovered = hovered_element(ui);
        self.hud.set_hovered(hovered.map(|(rect, _)| rect));
        let mut elements = 0;
        ui.registry().walk(&mut |_| elements += 1);
        self.hud.metrics = Some(Metrics {
            update_ms,
            elements,
            hovered_kind: hovered.map(|(_, kind)| kind),
        });
        self.hud.overlay(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::{MonospaceMeasure, SceneNode, SceneRenderer};
    use web_time::Duration;

    #[test]
    fn fps_is_an_ema_of_frame_rate() {
        let mut hud = Hud::new();
        let t0 = Instant::now();
        hud.tick(t0);
        hud.tick(t0 + Duration::from_millis(100));
        assert!((hud.fps() - 10.0).abs() < 0.01);
        hud.tick(t0 + Duration::from_millis(150));
        // 0.8 * 10 + 0.2 * 20
        assert!((hud.fps() - 12.0).abs() < 0.05);
        assert_eq!(hud.frame_count(), 3);
    }

    #[test]
    fn inspector_outlines_hovered_child() {
        let mut ui = Ui::new(MonospaceMeasure::default());
        ui.set_viewport(400.0, 300.0, 400.0, 300.0);
        ui.add(
            Element::scroll_container()
                .at(10.0, 10.0)
                .sized(200.0, 100.0)
                .child(Element::button("inner", || {}).at(5.0, 5.0).sized(50.0, 20.0)),
        );
        ui.process_mouse(Vec2::new(20.0, 20.0), false, false);
        assert_eq!(
            hovered_element(&ui),
            Some((Rect::new(15.0, 15.0, 50.0, 20.0), "Button"))
        );

        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut insp = Inspector::new();
        insp.frame(&ui, &mut r, Instant::now(), 0.5);
        assert!(r.scene.nodes.is_empty());

        insp.hud.toggle_inspector();
        insp.frame(&ui, &mut r, Instant::now(), 0.5);
        assert!(insp.hud.status_line().contains("elements: 2"));
        assert!(r.scene.nodes.iter().any(|n| matches!(
            n,
            SceneNode::RoundedRect { border: Some(_), .. }
        )));
    }
}
