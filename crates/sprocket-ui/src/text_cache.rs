//! Owned text textures.
//!
//! Each element owns zero or one texture. The texture is recreated when the
//! derived [`TextKey`] changes; the previous handle is offered back to the
//! renderer for reuse and released if the renderer hands out a new one.

use sprocket_core::{Renderer, TextTexture, TextureHandle};

#[derive(Clone, Debug, PartialEq)]
pub struct TextKey {
    pub text: String,
    font_bits: u32,
    pub caret: usize,
    pub selection: (usize, usize),
}

impl TextKey {
    pub fn label(text: &str, font_size: f32) -> Self {
        Self {
            text: text.to_string(),
            font_bits: font_size.to_bits(),
            caret: 0,
            selection: (0, 0),
        }
    }

    pub fn editing(text: &str, font_size: f32, caret: usize, selection: (usize, usize)) -> Self {
        Self {
            text: text.to_string(),
            font_bits: font_size.to_bits(),
            caret,
            selection,
        }
    }

    pub fn font_size(&self) -> f32 {
        f32::from_bits(self.font_bits)
    }
}

#[derive(Debug, Default)]
pub struct TextCache {
    key: Option<TextKey>,
    texture: Option<TextTexture>,
}

impl TextCache {
    /// Returns a texture for `key`, rasterizing only when the key changed.
    pub fn resolve(&mut self, r: &mut dyn Renderer, key: TextKey) -> Option<TextTexture> {
        if self.key.as_ref() == Some(&key) {
            return self.texture;
        }

        if key.text.is_empty() {
            if let Some(old) = self.texture.take() {
                r.release_texture(old.handle);
            }
            self.key = Some(key);
            return None;
        }

        let prev = self.texture.take().map(|t| t.handle);
        let tex = r.create_text_texture(&key.text, key.font_size(), prev);
        if let Some(prev) = prev
            && prev != tex.handle
        {
            r.release_texture(prev);
        }
        self.key = Some(key);
        self.texture = tex.handle.is_valid().then_some(tex);
        self.texture
    }

    /// Drops the cache, queueing any owned handle for release.
    pub fn reset(&mut self, releases: &mut Vec<TextureHandle>) {
        self.key = None;
        if let Some(t) = self.texture.take() {
            releases.push(t.handle);
        }
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.texture.map(|t| t.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::{MonospaceMeasure, SceneRenderer};

    #[test]
    fn rasterizes_once_per_key() {
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut cache = TextCache::default();
        let a = cache.resolve(&mut r, TextKey::label("ok", 16.0));
        let b = cache.resolve(&mut r, TextKey::label("ok", 16.0));
        assert_eq!(a, b);
        assert_eq!(r.textures_created(), 1);

        cache.resolve(&mut r, TextKey::label("cancel", 16.0));
        assert_eq!(r.textures_created(), 2);
        assert_eq!(r.live_textures(), 1);
    }

    #[test]
    fn empty_text_releases_texture() {
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut cache = TextCache::default();
        cache.resolve(&mut r, TextKey::label("x", 16.0));
        assert!(cache.resolve(&mut r, TextKey::label("", 16.0)).is_none());
        assert_eq!(r.live_textures(), 0);
        assert_eq!(cache.handle(), None);
    }

    #[test]
    fn reset_queues_handle() {
        let mut r = SceneRenderer::new(MonospaceMeasure::default());
        let mut cache = TextCache::default();
        let t = cache.resolve(&mut r, TextKey::label("x", 16.0)).unwrap();
        let mut releases = Vec::new();
        cache.reset(&mut releases);
        assert_eq!(releases, vec![t.handle]);
        assert_eq!(cache.handle(), None);
    }
}
