use sprocket_core::{Color, Renderer, TextureHandle, Vec2};

use crate::text_cache::{TextCache, TextKey};

/// Entries fade out linearly over their last this-many milliseconds.
pub const FADE_MS: f32 = 300.0;

/// One self-expiring line of text.
pub struct TimedText {
    pub pos: Vec2,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    pub alpha: f32,
    /// Milliseconds left before removal.
    pub remaining_ms: f32,
    cache: TextCache,
}

impl TimedText {
    pub fn new(text: impl Into<String>, pos: Vec2, font_size: f32, lifetime_ms: f32) -> Self {
        Self {
            pos,
            text: text.into(),
            font_size,
            color: Color::WHITE,
            alpha: 1.0,
            remaining_ms: lifetime_ms,
            cache: TextCache::default(),
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Base alpha scaled down over the final [`FADE_MS`].
    pub fn current_alpha(&self) -> f32 {
        self.alpha * (self.remaining_ms / FADE_MS).clamp(0.0, 1.0)
    }
}

/// Write-only notification layer drawn above everything else.
#[derive(Default)]
pub struct TimedTextOverlay {
    entries: Vec<TimedText>,
}

impl TimedTextOverlay {
    pub fn push(&mut self, entry: TimedText) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    /// Counts every entry down by `dt` seconds and drops the expired ones.
    pub fn update(&mut self, dt: f32, releases: &mut Vec<TextureHandle>) {
        for e in &mut self.entries {
            e.remaining_ms -= dt * 1000.0;
        }
        self.entries.retain_mut(|e| {
            if e.remaining_ms > 0.0 {
                return true;
            }
            e.cache.reset(releases);
            false
        });
    }

    pub fn reset_text_caches(&mut self, releases: &mut Vec<TextureHandle>) {
        for e in &mut self.entries {
            e.cache.reset(releases);
        }
    }

    pub fn draw(&mut self, r: &mut dyn Renderer) {
        for e in &mut self.entries {
            if let Some(tex) = e.cache.resolve(r, TextKey::label(&e.text, e.font_size)) {
                r.draw_texture(tex.handle, e.pos, tex.size(), e.color, e.current_alpha());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::{MonospaceMeasure, SceneNode, SceneRenderer};

    fn drawn_alpha(r: &SceneRenderer<MonospaceMeasure>) -> Option<f32> {
        r.scene.nodes.iter().find_map(|n| match n {
            SceneNode::Texture { alpha, .. } => Some(*alpha),
            _ => None,
        })
    }

    #[test]
    fn entries_expire_independently() {
        let mut ov = TimedTextOverlay::default();
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut releases = Vec::new();
        ov.push(TimedText::new("short", Vec2::ZERO, 14.0, 100.0));
        ov.push(TimedText::new("long", Vec2::new(0.0, 20.0), 14.0, 1000.0));
        ov.draw(&mut r);
        assert_eq!(r.live_textures(), 2);

        ov.update(0.05, &mut releases);
        assert_eq!(ov.len(), 2);
        ov.update(0.05, &mut releases);
        assert_eq!(ov.texts().collect::<Vec<_>>(), ["long"]);
        assert_eq!(releases.len(), 1);

        ov.update(1.0, &mut releases);
        assert!(ov.is_empty());
        assert_eq!(releases.len(), 2);
    }

    #[test]
    fn entries_fade_out_before_expiring() {
        let mut ov = TimedTextOverlay::default();
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut releases = Vec::new();
        ov.push(TimedText::new("saved", Vec2::ZERO, 14.0, 1000.0).alpha(0.8));

        ov.draw(&mut r);
        assert_eq!(drawn_alpha(&r), Some(0.8));

        // 150 ms left: halfway through the fade
        ov.update(0.85, &mut releases);
        r.scene.clear();
        ov.draw(&mut r);
        let a = drawn_alpha(&r).unwrap_or_default();
        assert!((a - 0.4).abs() < 1e-3, "alpha {a}");
    }
}
