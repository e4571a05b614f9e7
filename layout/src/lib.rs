//! Pixel-precise text positioning over container-screen titles.
//!
//! A voxel-game server cannot draw arbitrary pixels on a client's screen, but
//! it *can* set a container screen's title to rich text rendered with custom
//! bitmap fonts. This crate turns 2D pixel coordinates and styled text into a
//! precisely ordered sequence of text runs and invisible movement glyphs that
//! the client's font renderer reassembles at exact horizontal and vertical
//! offsets.
//!
//! # Example
//!
//! ```
//! use glyph_canvas_layout::{CanvasFonts, Color, TextBuilder};
//!
//! let fonts = CanvasFonts::generate("canvas");
//!
//! let mut builder = TextBuilder::new(&fonts);
//! builder.set_y(20);
//! builder.set_cursor(50);
//! builder.set_color(Color::rgb(0xff5555));
//! builder.print("Hello");
//!
//! let compiled = builder.build();
//! assert!(!compiled.is_empty());
//! ```
mod builder;
mod collection;
mod font;
mod group;
mod registry;
mod rich_text;
mod spacer;

pub use self::{
    builder::*, collection::*, font::*, group::*, registry::*, rich_text::*, spacer::*,
};

use std::sync::Arc;

/// The fully generated font context: registry, movement font and absolute
/// vertical addressing, built once at startup and shared read-only afterwards.
#[derive(Debug)]
pub struct CanvasFonts {
    registry: FontRegistry,
    spacer: SpacerFont,
    absolute: AbsoluteFontCollection,
}

impl CanvasFonts {
    /// Generates the default font, the movement font and the absolute line
    /// collection under the given resource namespace.
    pub fn generate(namespace: &str) -> Self {
        let mut registry = FontRegistry::new(namespace);
        let spacer = SpacerFont::generate(FontIdent::new(namespace, "spacer"));
        registry.register(Arc::clone(spacer.font()));
        let absolute = AbsoluteFontCollection::generate(namespace, &mut registry);
        Self {
            registry,
            spacer,
            absolute,
        }
    }

    #[inline]
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    #[inline]
    pub fn spacer(&self) -> &SpacerFont {
        &self.spacer
    }

    #[inline]
    pub fn absolute(&self) -> &AbsoluteFontCollection {
        &self.absolute
    }
}
