//! Custom inventory-style interfaces for a voxel-game server, rendered by
//! repurposing container screens as a canvas.
//!
//! The host game gives servers no custom-GUI surface beyond slot grids and a
//! rich-text screen title. This crate builds arbitrary widget layouts and
//! pixel artwork on top of that title: widgets compile into precisely
//! positioned text runs and invisible movement glyphs
//! (`glyph_canvas_layout`), images become sliced bitmap-font glyphs
//! (`glyph_canvas_texture`), and a [`ScreenBuilder`] assembles and caches
//! the final title value per screen state.
//!
//! ```
//! use glyph_canvas::{CanvasFonts, LabelWidget, ScreenBuilder, ScreenInfo};
//!
//! let fonts = CanvasFonts::generate("canvas");
//! let mut screen = ScreenBuilder::new(&fonts, ScreenInfo::generic_9x6());
//! screen.set_title("Backpack");
//! screen.add_widget(20, 30, LabelWidget::new("Upgrades"));
//!
//! let title = screen.compile();
//! assert!(title.flat_text().contains("Upgrades"));
//! ```
mod screen;
mod screen_builder;
mod widget;

pub use self::{screen::*, screen_builder::*, widget::*};
pub use glyph_canvas_layout::*;
pub use glyph_canvas_texture::*;
