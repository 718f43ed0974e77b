use ahash::AHasher;
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping};
use once_cell::sync::OnceCell;
use sprocket_core::TextMeasure;
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Mutex,
};

const WIDTH_CACHE_CAP: usize = 4096;

struct Engine {
    fs: FontSystem,
    widths: HashMap<u64, f32>,
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        let fs = FontSystem::new();
        log::debug!("text engine: {} font faces loaded", fs.db().len());
        Mutex::new(Engine {
            fs,
            widths: HashMap::new(),
        })
    })
}

fn width_key(text: &str, px: f32) -> u64 {
    let mut h = AHasher::default();
    text.hash(&mut h);
    px.to_bits().hash(&mut h);
    h.finish()
}

// Shape a single line (no wrapping) and return the right edge of the last glyph.
fn shape_width(fs: &mut FontSystem, text: &str, px: f32) -> f32 {
    let mut buf = Buffer::new(fs, Metrics::new(px, px * 1.3));
    {
        let mut b = buf.borrow_with(fs);
        b.set_size(None, None);
        b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }

    let mut w = 0.0f32;
    for run in buf.layout_runs() {
        for g in run.glyphs {
            w = w.max(g.x + g.w);
        }
    }
    w
}

/// Width of `text` at `px`, shaped with the system font database. Results
/// are cached per (text, size).
pub fn measure_width(text: &str, px: f32) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let key = width_key(text, px);
    let mut eng = match engine().lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(&w) = eng.widths.get(&key) {
        return w;
    }
    let w = shape_width(&mut eng.fs, text, px);
    if eng.widths.len() >= WIDTH_CACHE_CAP {
        eng.widths.clear();
    }
    eng.widths.insert(key, w);
    w
}

/// [`TextMeasure`] backed by cosmic-text shaping.
#[derive(Clone, Copy, Debug, Default)]
pub struct CosmicMeasure;

impl TextMeasure for CosmicMeasure {
    fn measure_text_width(&self, text: &str, font_size: f32) -> f32 {
        measure_width(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_width() {
        assert_eq!(CosmicMeasure.measure_text_width("", 16.0), 0.0);
    }

    #[test]
    fn cache_key_depends_on_size() {
        assert_ne!(width_key("abc", 16.0), width_key("abc", 17.0));
        assert_eq!(width_key("abc", 16.0), width_key("abc", 16.0));
    }

    #[test]
    fn prefix_widths_never_shrink() {
        let text = "hello world";
        let mut last = 0.0;
        for (i, _) in text.char_indices().skip(1) {
            let w = measure_width(&text[..i], 16.0);
            assert!(w >= last);
            last = w;
        }
    }
}
