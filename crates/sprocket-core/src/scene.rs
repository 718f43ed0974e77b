//! Recording renderer.
//!
//! `SceneRenderer` implements [`Renderer`] by appending every draw call to a
//! [`Scene`]. Headless hosts can replay the scene into their own backend;
//! tests assert against it directly.

use std::collections::HashMap;

use crate::{Border, Color, Renderer, Size, TextMeasure, TextTexture, TextureHandle, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        pos: Vec2,
        size: Size,
        color: Color,
        alpha: f32,
    },
    RoundedRect {
        pos: Vec2,
        size: Size,
        color: Color,
        radius: f32,
        border: Option<Border>,
    },
    Texture {
        handle: TextureHandle,
        pos: Vec2,
        size: Size,
        color: Color,
        alpha: f32,
    },
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

pub struct SceneRenderer<M: TextMeasure> {
    pub scene: Scene,
    measure: M,
    next_handle: u32,
    textures: HashMap<TextureHandle, String>,
    created: usize,
    released: usize,
}

impl<M: TextMeasure> SceneRenderer<M> {
    pub fn new(measure: M) -> Self {
        Self {
            scene: Scene::default(),
            measure,
            next_handle: 1,
            textures: HashMap::new(),
            created: 0,
            released: 0,
        }
    }

    /// Text a live texture was created from.
    pub fn texture_text(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(&handle).map(String::as_str)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn textures_created(&self) -> usize {
        self.created
    }

    pub fn textures_released(&self) -> usize {
        self.released
    }

    /// Texts of every texture drawn in the current scene, in draw order.
    pub fn drawn_texts(&self) -> Vec<&str> {
        self.scene
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Texture { handle, .. } => self.texture_text(*handle),
                _ => None,
            })
            .collect()
    }
}

impl<M: TextMeasure> TextMeasure for SceneRenderer<M> {
    fn measure_text_width(&self, text: &str, font_size: f32) -> f32 {
        self.measure.measure_text_width(text, font_size)
    }
}

impl<M: TextMeasure> Renderer for SceneRenderer<M> {
    fn draw_rect(&mut self, pos: Vec2, size: Size, color: Color, alpha: f32) {
        self.scene.nodes.push(SceneNode::Rect {
            pos,
            size,
            color,
            alpha,
        });
    }

    fn draw_rounded_rect(
        &mut self,
        pos: Vec2,
        size: Size,
        color: Color,
        radius: f32,
        border: Option<Border>,
    ) {
        self.scene.nodes.push(SceneNode::RoundedRect {
            pos,
            size,
            color,
            radius,
            border,
        });
    }

    fn draw_texture(&mut self, handle: TextureHandle, pos: Vec2, size: Size, color: Color, alpha: f32) {
        if !handle.is_valid() || !self.textures.contains_key(&handle) {
            return;
        }
        self.scene.nodes.push(SceneNode::Texture {
            handle,
            pos,
            size,
            color,
            alpha,
        });
    }

    fn create_text_texture(
        &mut self,
        text: &str,
        font_size: f32,
        reuse: Option<TextureHandle>,
    ) -> TextTexture {
        let handle = match reuse {
            Some(h) if self.textures.contains_key(&h) => h,
            _ => {
                let h = TextureHandle(self.next_handle);
                self.next_handle += 1;
                h
            }
        };
        self.textures.insert(handle, text.to_string());
        self.created += 1;
        TextTexture {
            handle,
            width: self.measure.measure_text_width(text, font_size),
            height: (font_size * 1.3).ceil(),
        }
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_some() {
            self.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonospaceMeasure;

    #[test]
    fn reuse_keeps_handle_and_skips_dead_draws() {
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let a = r.create_text_texture("one", 16.0, None);
        let b = r.create_text_texture("two", 16.0, Some(a.handle));
        assert_eq!(a.handle, b.handle);
        assert_eq!(r.texture_text(b.handle), Some("two"));
        assert_eq!(b.width, 24.0);

        r.release_texture(b.handle);
        r.draw_texture(b.handle, Vec2::ZERO, b.size(), Color::WHITE, 1.0);
        r.draw_texture(TextureHandle::NONE, Vec2::ZERO, b.size(), Color::WHITE, 1.0);
        assert!(r.scene.nodes.is_empty());
        assert_eq!(r.live_textures(), 0);
    }
}
