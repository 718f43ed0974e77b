//! # Core types
//!
//! `sprocket-core` holds everything the widget layer and its hosts agree on:
//!
//! - geometry (`Vec2`, `Size`, `Rect`) and `Color`/`Palette`,
//! - input events (`KeyEvent`, `Modifiers`),
//! - `CoordinateSpace` for logical ↔ device conversion,
//! - the `Renderer` / `TextMeasure` collaborator traits and a recording
//!   `SceneRenderer`,
//! - `Clock`, `UiConfig` and the crate `Error`.
//!
//! ```rust
//! use sprocket_core::*;
//!
//! let mut cs = CoordinateSpace::default();
//! cs.set_viewport(800.0, 600.0, 1600.0, 1200.0);
//! assert_eq!(cs.to_device(Vec2::new(10.0, 20.0)), Vec2::new(20.0, 40.0));
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod input;
pub mod render_api;
pub mod scene;
pub mod tests;

pub use clock::*;
pub use color::*;
pub use config::*;
pub use coords::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use input::*;
pub use render_api::*;
pub use scene::*;
