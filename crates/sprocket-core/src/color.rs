use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let channel = |i: usize, default: u8| {
            s.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(default)
        };
        match s.len() {
            6 => Color(channel(0, 0), channel(2, 0), channel(4, 0), 255),
            8 => Color(channel(0, 0), channel(2, 0), channel(4, 0), channel(6, 255)),
            _ => Color::BLACK,
        }
    }
}

/// Fixed widget colors. There is no theming beyond this table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub surface: Color,
    pub on_surface: Color,
    pub primary: Color,
    pub on_primary: Color,
    pub outline: Color,
    pub focus: Color,

    pub button_bg: Color,
    pub button_bg_hover: Color,
    pub button_bg_pressed: Color,

    pub field_bg: Color,
    pub selection: Color,
    pub caret: Color,
    pub hint: Color,

    pub track: Color,
    pub scrim: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            surface: Color::from_rgb(0x1E, 0x1E, 0x1E),
            on_surface: Color::from_rgb(0xDD, 0xDD, 0xDD),
            primary: Color::from_rgb(0x34, 0xAF, 0x82),
            on_primary: Color::WHITE,
            outline: Color::from_rgb(0x55, 0x55, 0x55),
            focus: Color::from_rgb(0x88, 0xCC, 0xFF),
            button_bg: Color::from_rgb(0x34, 0xAF, 0x82),
            button_bg_hover: Color::from_rgb(0x2A, 0x8F, 0x6A),
            button_bg_pressed: Color::from_rgb(0x1F, 0x75, 0x56),
            field_bg: Color::from_rgb(0x12, 0x12, 0x12),
            selection: Color::from_rgba(0x88, 0xCC, 0xFF, 96),
            caret: Color::from_rgb(0xDD, 0xDD, 0xDD),
            hint: Color::from_rgb(0x88, 0x88, 0x88),
            track: Color::from_rgba(0xDD, 0xDD, 0xDD, 48),
            scrim: Color::from_rgba(0, 0, 0, 160),
        }
    }
}
