//! Logical ↔ device unit conversion.
//!
//! Everything the host hands in (pointer positions, element sizes) is in
//! logical units. Hit-testing runs in device (framebuffer) space so that it
//! agrees with what ends up on screen at any DPI.

use crate::{Rect, Size, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateSpace {
    window: Size,
    device: Size,
    scale: Vec2,
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self {
            window: Size::new(1.0, 1.0),
            device: Size::new(1.0, 1.0),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl CoordinateSpace {
    pub fn new(window_w: f32, window_h: f32, device_w: f32, device_h: f32) -> Self {
        let mut cs = Self::default();
        cs.set_viewport(window_w, window_h, device_w, device_h);
        cs
    }

    /// Updates sizes, clamping non-positive values to 1. Returns true when any
    /// dimension actually changed.
    pub fn set_viewport(&mut self, window_w: f32, window_h: f32, device_w: f32, device_h: f32) -> bool {
        let sane = |v: f32| if v > 0.0 { v } else { 1.0 };
        let window = Size::new(sane(window_w), sane(window_h));
        let device = Size::new(sane(device_w), sane(device_h));
        let changed = window != self.window || device != self.device;

        self.window = window;
        self.device = device;
        self.scale = Vec2::new(device.width / window.width, device.height / window.height);
        if changed {
            log::debug!(
                "viewport {}x{} (device {}x{}, scale {:.2}x{:.2})",
                window.width,
                window.height,
                device.width,
                device.height,
                self.scale.x,
                self.scale.y
            );
        }
        changed
    }

    pub fn window_size(&self) -> Size {
        self.window
    }

    pub fn device_size(&self) -> Size {
        self.device
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Mean of the two axis scales; used for scalar lengths (padding, radii).
    pub fn scale_avg(&self) -> f32 {
        (self.scale.x + self.scale.y) * 0.5
    }

    pub fn to_device(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.scale.x, p.y * self.scale.y)
    }

    pub fn to_logical(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.scale.x, p.y / self.scale.y)
    }

    pub fn rect_to_device(&self, r: Rect) -> Rect {
        Rect::new(
            r.x * self.scale.x,
            r.y * self.scale.y,
            r.w * self.scale.x,
            r.h * self.scale.y,
        )
    }

    pub fn length_to_device(&self, l: f32) -> f32 {
        l * self.scale_avg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidpi_scale_per_axis() {
        let cs = CoordinateSpace::new(800.0, 600.0, 1600.0, 900.0);
        assert_eq!(cs.scale(), Vec2::new(2.0, 1.5));
        assert_eq!(cs.scale_avg(), 1.75);
        assert_eq!(cs.to_device(Vec2::new(10.0, 10.0)), Vec2::new(20.0, 15.0));
        assert_eq!(cs.to_logical(Vec2::new(20.0, 15.0)), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn degenerate_sizes_clamp_to_one() {
        let mut cs = CoordinateSpace::default();
        cs.set_viewport(0.0, -5.0, 0.0, 10.0);
        assert_eq!(cs.window_size(), Size::new(1.0, 1.0));
        assert_eq!(cs.device_size(), Size::new(1.0, 10.0));
        assert_eq!(cs.scale(), Vec2::new(1.0, 10.0));
    }

    #[test]
    fn reports_only_real_changes() {
        let mut cs = CoordinateSpace::default();
        assert!(cs.set_viewport(640.0, 480.0, 640.0, 480.0));
        assert!(!cs.set_viewport(640.0, 480.0, 640.0, 480.0));
        assert!(cs.set_viewport(640.0, 480.0, 1280.0, 960.0));
    }
}
