use crate::{Color, Size, Vec2};

/// Opaque texture id handed out by the renderer. Zero means "no texture";
/// draws with it are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const NONE: TextureHandle = TextureHandle(0);

    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

/// Result of rasterizing a string: the handle and its logical size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextTexture {
    pub handle: TextureHandle,
    pub width: f32,
    pub height: f32,
}

impl TextTexture {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

/// Left-to-right single line measurement. Width must grow monotonically with
/// the prefix length; caret hit-testing relies on it.
pub trait TextMeasure {
    fn measure_text_width(&self, text: &str, font_size: f32) -> f32;
}

/// The drawing collaborator. All positions and sizes are logical; the
/// implementation maps them to device space with the same scale factors as
/// [`crate::CoordinateSpace`].
pub trait Renderer: TextMeasure {
    fn draw_rect(&mut self, pos: Vec2, size: Size, color: Color, alpha: f32);

    fn draw_rounded_rect(
        &mut self,
        pos: Vec2,
        size: Size,
        color: Color,
        radius: f32,
        border: Option<Border>,
    );

    fn draw_texture(&mut self, handle: TextureHandle, pos: Vec2, size: Size, color: Color, alpha: f32);

    /// Rasterizes `text`. `reuse` is the handle previously held by the
    /// caller; implementations may overwrite it in place and return it again.
    fn create_text_texture(
        &mut self,
        text: &str,
        font_size: f32,
        reuse: Option<TextureHandle>,
    ) -> TextTexture;

    fn release_texture(&mut self, handle: TextureHandle);
}

/// Every `char` advances by `font_size * ratio`. Handy for headless hosts
/// and tests where a real font is not wanted.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    pub ratio: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl MonospaceMeasure {
    /// Advance such that each character is exactly `advance` wide at `font_size`.
    pub fn with_advance(advance: f32, font_size: f32) -> Self {
        Self {
            ratio: advance / font_size,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.ratio
    }
}
