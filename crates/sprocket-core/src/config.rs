use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::Palette;

/// What happens to an unanswered dialog callback when another dialog is shown
/// on top of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalReplace {
    /// The earlier callback is dropped without being invoked.
    #[default]
    DropPrevious,
    /// The earlier callback is invoked with `false` before being replaced.
    CancelPrevious,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Two clicks on the same text box closer than this select a word.
    pub double_click_ms: u64,
    /// Caret visibility toggles every this many seconds while focused.
    pub caret_blink_secs: f32,
    /// Horizontal text inset inside a text box, logical units.
    pub text_padding_x: f32,
    pub font_size: f32,
    /// Value change per Left/Right press on a focused slider.
    pub slider_key_step: f32,
    pub modal_replace: ModalReplace,
    pub palette: Palette,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 400,
            caret_blink_secs: 0.5,
            text_padding_x: 8.0,
            font_size: 16.0,
            slider_key_step: 0.05,
            modal_replace: ModalReplace::DropPrevious,
            palette: Palette::default(),
        }
    }
}

impl UiConfig {
    /// Parses a (possibly partial) JSON document; missing fields keep defaults.
    pub fn from_json(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = UiConfig::from_json(r#"{ "double_click_ms": 250, "modal_replace": "cancel_previous" }"#)
            .unwrap();
        assert_eq!(cfg.double_click_ms, 250);
        assert_eq!(cfg.modal_replace, ModalReplace::CancelPrevious);
        assert_eq!(cfg.caret_blink_secs, 0.5);
        assert_eq!(cfg.palette, Palette::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = UiConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
