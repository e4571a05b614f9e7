//! Texture slicing and resource-pack emission for glyph_canvas.
//!
//! Source images become sequences of bitmap-font glyphs: a [`Texture`]
//! splits its raster into bounded-width [`TexturePiece`]s, each mapped to a
//! unique character drawn from a [`TextureSession`], and knows how to emit
//! itself into a `TextBuilder` at a target pixel position. The
//! [`ResourcePackBuilder`] serializes everything the client needs to render
//! the result: font definition JSON for generated line fonts, the movement
//! font, and one glyph bitmap per piece.
//!
//! Slicing and decoding happen once per texture at registration time, on the
//! calling thread. A texture that fails to load logs the failure and simply
//! contributes nothing to the screen.
mod chars;
mod piece;
mod resource_pack;
mod session;
mod texture;

pub use self::{piece::*, resource_pack::*, session::*, texture::*};
