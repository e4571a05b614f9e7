use crate::{piece::TexturePiece, session::TextureSession};
use glyph_canvas_layout::{Color, FontIdent, TextBuilder, BASELINE_ASCENT};
use image::RgbaImage;
use std::{fmt, path::PathBuf};
use thiserror::Error;

/// Hard client-imposed ceiling on the width of one glyph bitmap.
pub const MAX_PIECE_WIDTH: u32 = 128;

/// Namespaced identifier of a source image, e.g. `canvas:gui/background.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureIdent {
    namespace: String,
    path: String,
}

impl TextureIdent {
    pub fn new(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for TextureIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture `{ident}`: {source}")]
    Io {
        ident: TextureIdent,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture `{ident}`: {source}")]
    Decode {
        ident: TextureIdent,
        #[source]
        source: image::ImageError,
    },
}

/// A source of decoded raster images addressed by identifier.
pub trait ResourceProvider {
    fn load_image(&self, ident: &TextureIdent) -> Result<RgbaImage, TextureError>;
}

/// Loads images from an asset directory laid out as
/// `<root>/<namespace>/textures/<path>`.
#[derive(Debug)]
pub struct FsResourceProvider {
    root: PathBuf,
}

impl FsResourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for FsResourceProvider {
    fn load_image(&self, ident: &TextureIdent) -> Result<RgbaImage, TextureError> {
        let path = self
            .root
            .join(ident.namespace())
            .join("textures")
            .join(ident.path());
        let bytes = std::fs::read(&path).map_err(|source| TextureError::Io {
            ident: ident.clone(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
            ident: ident.clone(),
            source,
        })?;
        Ok(decoded.to_rgba8())
    }
}

/// How a texture anchors vertically, replacing the old per-kind subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Screen artwork anchored at a position within the parent gui.
    Gui { origin_x: i32, origin_y: i32 },
    /// Widget artwork anchored at its widget row.
    Widget { target_y: i32 },
    /// A small inline icon at the baseline.
    Icon,
}

impl TextureKind {
    #[inline]
    pub fn anchor_x(self) -> i32 {
        match self {
            TextureKind::Gui { origin_x, .. } => origin_x,
            _ => 0,
        }
    }

    #[inline]
    pub fn anchor_y(self) -> i32 {
        match self {
            TextureKind::Gui { origin_y, .. } => origin_y,
            TextureKind::Widget { target_y } => target_y,
            TextureKind::Icon => 0,
        }
    }
}

/// One sliced row of a texture: the pieces generated for a single vertical
/// offset.
#[derive(Debug, Clone)]
pub struct TextureRow {
    y_offset: i32,
    pieces: Vec<TexturePiece>,
}

impl TextureRow {
    #[inline]
    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    #[inline]
    pub fn pieces(&self) -> &[TexturePiece] {
        &self.pieces
    }
}

/// A source image sliced into bounded-width glyph pieces, rendered by
/// emitting its piece characters into a [`TextBuilder`].
///
/// Slicing happens once at registration. A failed load is logged and leaves
/// the texture empty: a broken decorative image renders as a blank area
/// instead of keeping the screen from opening.
#[derive(Debug)]
pub struct Texture {
    ident: TextureIdent,
    kind: TextureKind,
    gui_number: u32,
    font: FontIdent,
    width: u32,
    height: u32,
    source: Option<RgbaImage>,
    rows: Vec<TextureRow>,
}

impl Texture {
    /// Loads and slices a texture. Never fails; see the type docs.
    pub fn load(
        ident: TextureIdent,
        kind: TextureKind,
        provider: &dyn ResourceProvider,
        session: &mut TextureSession,
    ) -> Self {
        match provider.load_image(&ident) {
            Ok(image) => Self::from_image(ident, kind, image, session),
            Err(err) => {
                log::error!("texture `{}` unavailable, rendering nothing: {}", ident, err);
                Self {
                    ident,
                    kind,
                    gui_number: session.next_gui_number(),
                    font: FontIdent::new(session.namespace(), "default"),
                    width: 0,
                    height: 0,
                    source: None,
                    rows: Vec::new(),
                }
            }
        }
    }

    /// A solid white texture, for rectangles and fills; pair with
    /// [`ColouredTexture`] to tint it.
    pub fn solid(width: u32, height: u32, kind: TextureKind, session: &mut TextureSession) -> Self {
        let image = RgbaImage::from_pixel(width.max(1), height.max(1), image::Rgba([255; 4]));
        let ident = TextureIdent::new(
            session.namespace(),
            &format!("generated/solid_{}x{}.png", width, height),
        );
        Self::from_image(ident, kind, image, session)
    }

    /// Slices an already decoded image into the base row.
    pub fn from_image(
        ident: TextureIdent,
        kind: TextureKind,
        image: RgbaImage,
        session: &mut TextureSession,
    ) -> Self {
        let gui_number = session.next_gui_number();
        let font = FontIdent::new(session.namespace(), &format!("gui/{}", gui_number));
        let mut texture = Self {
            ident,
            kind,
            gui_number,
            font,
            width: image.width(),
            height: image.height(),
            source: Some(image),
            rows: Vec::new(),
        };
        texture.add_row(0, session);
        texture
    }

    #[inline]
    pub fn ident(&self) -> &TextureIdent {
        &self.ident
    }

    #[inline]
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    #[inline]
    pub fn gui_number(&self) -> u32 {
        self.gui_number
    }

    /// The generated font holding this texture's piece glyphs.
    #[inline]
    pub fn font(&self) -> &FontIdent {
        &self.font
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn rows(&self) -> &[TextureRow] {
        &self.rows
    }

    /// Number of pieces each row slices into.
    pub fn piece_count(&self) -> u32 {
        if self.width == 0 {
            0
        } else {
            (self.width + MAX_PIECE_WIDTH - 1) / MAX_PIECE_WIDTH
        }
    }

    /// Slices an additional row at a vertical offset from the texture's
    /// anchor, assigning fresh characters from the session. A row that
    /// already exists, or a texture that failed to load, is left as is.
    pub fn add_row(&mut self, y_offset: i32, session: &mut TextureSession) {
        let source = match &self.source {
            Some(source) => source,
            None => return,
        };
        if self.rows.iter().any(|row| row.y_offset == y_offset) {
            return;
        }

        let ascent = BASELINE_ASCENT - (self.kind.anchor_y() + y_offset);
        let mut pieces = Vec::with_capacity(self.piece_count() as usize);
        for index in 0..self.piece_count() {
            let x0 = index * MAX_PIECE_WIDTH;
            let piece_width = (self.width - x0).min(MAX_PIECE_WIDTH);
            let mut slab = image::imageops::crop_imm(source, x0, 0, piece_width, self.height)
                .to_image();
            ensure_visible_edge(&mut slab);
            pieces.push(TexturePiece::new(index, session.next_char(), ascent, slab));
        }
        self.rows.push(TextureRow { y_offset, pieces });
    }

    /// Renders the base row at pixel `x`.
    pub fn add_to_builder(&self, builder: &mut TextBuilder<'_>, x: i32) {
        self.render(builder, x, 0, usize::MAX, None)
    }

    /// Renders the row sliced for `y_offset` at pixel `x`.
    pub fn add_to_builder_at(&self, builder: &mut TextBuilder<'_>, x: i32, y_offset: i32) {
        self.render(builder, x, y_offset, usize::MAX, None)
    }

    /// Renders only the first `pieces` pieces of the base row; the partial
    /// rendering behind progress-style displays.
    pub fn add_partial(&self, builder: &mut TextBuilder<'_>, x: i32, pieces: usize) {
        self.render(builder, x, 0, pieces, None)
    }

    /// Renders the first `pieces` pieces of the row sliced for `y_offset`.
    pub fn add_partial_at(
        &self,
        builder: &mut TextBuilder<'_>,
        x: i32,
        y_offset: i32,
        pieces: usize,
    ) {
        self.render(builder, x, y_offset, pieces, None)
    }

    fn render(
        &self,
        builder: &mut TextBuilder<'_>,
        x: i32,
        y_offset: i32,
        limit: usize,
        color: Option<Color>,
    ) {
        let row = match self.rows.iter().find(|row| row.y_offset == y_offset) {
            Some(row) if !row.pieces.is_empty() => row,
            _ => {
                if self.source.is_some() {
                    log::warn!("texture `{}` has no row sliced at y {}", self.ident, y_offset);
                }
                return;
            }
        };

        builder.set_cursor(x);
        let start = builder.cursor();

        // Piece glyphs advance one extra pixel each; stitch with -1 so the
        // slabs sit flush. The tracked cursor is reconciled once afterwards.
        let mut advanced = 0;
        let mut buf = [0u8; 4];
        for piece in row.pieces.iter().take(limit) {
            let glyph = piece.ch().encode_utf8(&mut buf);
            match color {
                Some(color) => builder.insert_unsafe_colored(glyph, &self.font, color),
                None => builder.insert_unsafe(glyph, &self.font),
            }
            builder.move_cursor_unsafe(-1);
            advanced += piece.width() as i32;
        }
        builder.override_cursor(start + advanced);
    }
}

/// A texture rendered in an explicit color, passed down per call instead of
/// toggling shared state.
#[derive(Debug)]
pub struct ColouredTexture<'a> {
    texture: &'a Texture,
    color: Color,
}

impl<'a> ColouredTexture<'a> {
    pub fn new(texture: &'a Texture, color: Color) -> Self {
        Self { texture, color }
    }

    pub fn add_to_builder(&self, builder: &mut TextBuilder<'_>, x: i32) {
        self.texture
            .render(builder, x, 0, usize::MAX, Some(self.color))
    }

    pub fn add_to_builder_at(&self, builder: &mut TextBuilder<'_>, x: i32, y_offset: i32) {
        self.texture
            .render(builder, x, y_offset, usize::MAX, Some(self.color))
    }

    pub fn add_partial(&self, builder: &mut TextBuilder<'_>, x: i32, pieces: usize) {
        self.texture.render(builder, x, 0, pieces, Some(self.color))
    }
}

/// A glyph bitmap whose rightmost column is fully transparent may be
/// discarded or misaligned by the client's font loader; nudge one corner
/// pixel to a just-nonzero alpha.
fn ensure_visible_edge(image: &mut RgbaImage) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let edge = width - 1;
    if (0..height).all(|y| image.get_pixel(edge, y)[3] == 0) {
        image.get_pixel_mut(edge, 0)[3] = 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glyph_canvas_layout::CanvasFonts;
    use image::Rgba;
    use once_cell::sync::Lazy;

    static FONTS: Lazy<CanvasFonts> = Lazy::new(|| CanvasFonts::generate("test"));

    fn opaque(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]))
    }

    #[test]
    fn slicing_covers_the_source_exactly() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "gui/wide.png"),
            TextureKind::Icon,
            opaque(300, 20),
            &mut session,
        );

        assert_eq!(texture.piece_count(), 3);
        let widths: Vec<u32> = texture.rows()[0].pieces().iter().map(|p| p.width()).collect();
        assert_eq!(widths, vec![128, 128, 44]);
        assert_eq!(widths.iter().sum::<u32>(), 300);
    }

    #[test]
    fn narrow_image_is_a_single_piece() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "gui/icon.png"),
            TextureKind::Icon,
            opaque(16, 16),
            &mut session,
        );
        assert_eq!(texture.piece_count(), 1);
        assert_eq!(texture.rows()[0].pieces()[0].width(), 16);
    }

    #[test]
    fn chars_never_collide_across_textures() {
        let mut session = TextureSession::new("test");
        let a = Texture::from_image(
            TextureIdent::new("test", "a.png"),
            TextureKind::Icon,
            opaque(300, 8),
            &mut session,
        );
        let b = Texture::from_image(
            TextureIdent::new("test", "b.png"),
            TextureKind::Icon,
            opaque(300, 8),
            &mut session,
        );

        let mut seen = std::collections::HashSet::new();
        for texture in [&a, &b] {
            for row in texture.rows() {
                for piece in row.pieces() {
                    assert!(seen.insert(piece.ch()), "duplicate piece char {:?}", piece.ch());
                }
            }
        }
    }

    #[test]
    fn transparent_edge_gets_a_sentinel_pixel() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "clear.png"),
            TextureKind::Icon,
            RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])),
            &mut session,
        );

        let piece = &texture.rows()[0].pieces()[0];
        assert_eq!(piece.image().get_pixel(9, 0)[3], 1);
        assert_eq!(piece.image().get_pixel(9, 1)[3], 0);
    }

    #[test]
    fn opaque_edge_is_left_alone() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "solid.png"),
            TextureKind::Icon,
            opaque(10, 10),
            &mut session,
        );
        assert_eq!(texture.rows()[0].pieces()[0].image().get_pixel(9, 0)[3], 255);
    }

    #[test]
    fn widget_rows_carry_offset_ascent() {
        let mut session = TextureSession::new("test");
        let mut texture = Texture::from_image(
            TextureIdent::new("test", "w.png"),
            TextureKind::Widget { target_y: 20 },
            opaque(16, 8),
            &mut session,
        );
        texture.add_row(18, &mut session);

        let base = texture.rows()[0].pieces()[0].ascent();
        let offset = texture.rows()[1].pieces()[0].ascent();
        assert_eq!(base, BASELINE_ASCENT - 20);
        assert_eq!(offset, base - 18);
    }

    #[test]
    fn adding_the_same_row_twice_is_a_no_op() {
        let mut session = TextureSession::new("test");
        let mut texture = Texture::from_image(
            TextureIdent::new("test", "w.png"),
            TextureKind::Icon,
            opaque(16, 8),
            &mut session,
        );
        texture.add_row(0, &mut session);
        assert_eq!(texture.rows().len(), 1);
    }

    #[test]
    fn render_reconciles_the_cursor() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "wide.png"),
            TextureKind::Icon,
            opaque(300, 8),
            &mut session,
        );

        let mut builder = glyph_canvas_layout::TextBuilder::new(&FONTS);
        texture.add_to_builder(&mut builder, 30);
        assert_eq!(builder.cursor(), 330);

        let compiled = builder.build();
        let flat = compiled.flat_text();
        for piece in texture.rows()[0].pieces() {
            assert!(flat.contains(piece.ch()));
        }
    }

    #[test]
    fn partial_render_stops_after_requested_pieces() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "bar.png"),
            TextureKind::Icon,
            opaque(300, 8),
            &mut session,
        );

        let mut builder = glyph_canvas_layout::TextBuilder::new(&FONTS);
        texture.add_partial(&mut builder, 0, 2);
        assert_eq!(builder.cursor(), 256);

        let flat = builder.build().flat_text();
        let last = texture.rows()[0].pieces()[2].ch();
        assert!(!flat.contains(last));
    }

    #[test]
    fn failed_load_renders_nothing() {
        struct Broken;
        impl ResourceProvider for Broken {
            fn load_image(&self, ident: &TextureIdent) -> Result<RgbaImage, TextureError> {
                Err(TextureError::Io {
                    ident: ident.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
            }
        }

        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = TextureSession::new("test");
        let texture = Texture::load(
            TextureIdent::new("test", "gone.png"),
            TextureKind::Icon,
            &Broken,
            &mut session,
        );
        assert_eq!(texture.piece_count(), 0);

        let mut builder = glyph_canvas_layout::TextBuilder::new(&FONTS);
        texture.add_to_builder(&mut builder, 10);
        assert!(builder.build().is_empty());
    }

    #[test]
    fn solid_texture_is_opaque_and_sliced() {
        let mut session = TextureSession::new("test");
        let texture = Texture::solid(200, 4, TextureKind::Icon, &mut session);
        assert_eq!(texture.piece_count(), 2);
        assert_eq!(texture.rows()[0].pieces()[0].image().get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn coloured_wrapper_pins_color_per_call() {
        let mut session = TextureSession::new("test");
        let texture = Texture::from_image(
            TextureIdent::new("test", "tint.png"),
            TextureKind::Icon,
            opaque(16, 8),
            &mut session,
        );

        let mut builder = glyph_canvas_layout::TextBuilder::new(&FONTS);
        ColouredTexture::new(&texture, Color::rgb(0x00ff00)).add_to_builder(&mut builder, 0);
        texture.add_to_builder(&mut builder, 40);
        // the wrapper changed nothing about the builder's own color scope
        assert_eq!(builder.color(), glyph_canvas_layout::DEFAULT_COLOR);
    }
}
