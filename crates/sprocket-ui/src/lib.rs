//! Widgets, input routing, focus, dialogs and text fields.
//!
//! ```rust
//! use sprocket_core::*;
//! use sprocket_ui::*;
//!
//! let mut ui = Ui::new(MonospaceMeasure::default());
//! ui.set_viewport(800.0, 600.0, 800.0, 600.0);
//! let name = ui.add(Element::text_box(TextBox::new("name")).at(20.0, 20.0).sized(200.0, 32.0));
//!
//! ui.process_mouse(Vec2::new(30.0, 30.0), true, false);
//! ui.process_mouse(Vec2::new(30.0, 30.0), false, false);
//! ui.handle_text_input("Ada");
//! assert_eq!(ui.get(name).and_then(|e| e.as_text_box()).map(|t| t.text()), Some("Ada"));
//! ```

pub mod button;
pub mod checkbox;
pub mod clipboard;
pub mod element;
pub mod focus;
pub mod modal;
pub mod overlay;
pub mod registry;
pub mod router;
pub mod scroll;
pub mod slider;
pub mod text_cache;
pub mod textbox;
pub mod textfield;
pub mod ui;

pub use button::Button;
pub use checkbox::Checkbox;
pub use clipboard::Clipboard;
pub use element::{Element, ElementId, ElementKind, EventCtx, UpdateCtx};
pub use focus::FocusManager;
pub use modal::{ModalController, ModalHandle};
pub use overlay::{TimedText, TimedTextOverlay};
pub use registry::ElementRegistry;
pub use router::{InputRouter, MouseOutcome};
pub use scroll::ScrollContainer;
pub use slider::Slider;
pub use text_cache::{TextCache, TextKey};
pub use textbox::TextBox;
pub use textfield::TextEditState;
pub use ui::Ui;
