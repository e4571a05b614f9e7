use glyph_canvas_layout::{CanvasFonts, Color, TextBuilder, DEFAULT_COLOR};
use glyph_canvas_texture::Texture;
use std::{hash::Hasher, sync::Arc};

/// Anything that can draw itself into a render pass at a screen position.
///
/// Widgets are stateless between passes; everything that affects their
/// output must flow into [`state_hash`](Widget::state_hash) so compiled
/// screens can be cached.
pub trait Widget {
    /// Occupied size in pixels, as positioned content.
    fn size(&self, fonts: &CanvasFonts) -> (i32, i32);

    /// Draws the widget at screen-space `(x, y)`.
    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32);

    /// Feeds everything that affects this widget's output into `state`.
    fn state_hash(&self, state: &mut dyn Hasher);
}

/// A single line of colored text.
#[derive(Debug, Clone)]
pub struct LabelWidget {
    text: String,
    color: Color,
}

impl LabelWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: DEFAULT_COLOR,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for LabelWidget {
    fn size(&self, fonts: &CanvasFonts) -> (i32, i32) {
        let font = fonts.registry().standard();
        (font.str_width(&self.text, false), font.height())
    }

    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32) {
        builder.set_y(y);
        builder.set_cursor(x);
        builder.set_color(self.color);
        builder.print(&self.text);
        builder.set_color(DEFAULT_COLOR);
    }

    fn state_hash(&self, state: &mut dyn Hasher) {
        state.write(self.text.as_bytes());
        state.write_u32(self.color.as_rgb());
    }
}

/// A sliced texture drawn at a position.
///
/// The texture must carry a row sliced for the widget's title-relative
/// offset; textures are sliced at registration, not mid-pass.
#[derive(Debug, Clone)]
pub struct ImageWidget {
    texture: Arc<Texture>,
}

impl ImageWidget {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self { texture }
    }

    #[inline]
    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    /// The texture row offset that positions this widget at screen-space
    /// `y`, given the builder's origin translation.
    fn row_offset(&self, builder: &TextBuilder<'_>, y: i32) -> i32 {
        y + builder.origin().1 - self.texture.kind().anchor_y()
    }
}

impl Widget for ImageWidget {
    fn size(&self, _fonts: &CanvasFonts) -> (i32, i32) {
        (self.texture.width() as i32, self.texture.height() as i32)
    }

    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32) {
        let offset = self.row_offset(builder, y);
        self.texture.add_to_builder_at(builder, x, offset);
    }

    fn state_hash(&self, state: &mut dyn Hasher) {
        state.write_u32(self.texture.gui_number());
    }
}

/// A texture rendered up to a piece count; the partial rendering behind
/// progress bars.
#[derive(Debug, Clone)]
pub struct ProgressWidget {
    texture: Arc<Texture>,
    pieces: u32,
}

impl ProgressWidget {
    pub fn new(texture: Arc<Texture>, pieces: u32) -> Self {
        Self { texture, pieces }
    }

    /// Clamps a `0.0..=1.0` fraction to a whole piece count.
    pub fn with_progress(texture: Arc<Texture>, fraction: f32) -> Self {
        let total = texture.piece_count();
        let pieces = (fraction.clamp(0.0, 1.0) * total as f32).round() as u32;
        Self { texture, pieces }
    }

    #[inline]
    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn set_pieces(&mut self, pieces: u32) {
        self.pieces = pieces.min(self.texture.piece_count());
    }
}

impl Widget for ProgressWidget {
    fn size(&self, _fonts: &CanvasFonts) -> (i32, i32) {
        (self.texture.width() as i32, self.texture.height() as i32)
    }

    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32) {
        let offset = y + builder.origin().1 - self.texture.kind().anchor_y();
        self.texture
            .add_partial_at(builder, x, offset, self.pieces as usize);
    }

    fn state_hash(&self, state: &mut dyn Hasher) {
        state.write_u32(self.texture.gui_number());
        state.write_u32(self.pieces);
    }
}

/// A filled rectangle: a solid texture tinted per call.
#[derive(Debug, Clone)]
pub struct RectWidget {
    texture: Arc<Texture>,
    color: Color,
}

impl RectWidget {
    /// The texture should come from `Texture::solid`, anchored for the
    /// rectangle's position.
    pub fn new(texture: Arc<Texture>, color: Color) -> Self {
        Self { texture, color }
    }
}

impl Widget for RectWidget {
    fn size(&self, _fonts: &CanvasFonts) -> (i32, i32) {
        (self.texture.width() as i32, self.texture.height() as i32)
    }

    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32) {
        let offset = y + builder.origin().1 - self.texture.kind().anchor_y();
        glyph_canvas_texture::ColouredTexture::new(&self.texture, self.color)
            .add_to_builder_at(builder, x, offset);
    }

    fn state_hash(&self, state: &mut dyn Hasher) {
        state.write_u32(self.texture.gui_number());
        state.write_u32(self.color.as_rgb());
    }
}

/// A fixed arrangement of child widgets at relative offsets, rendered in
/// insertion order.
#[derive(Default)]
pub struct CombinedWidget {
    children: Vec<(i32, i32, Box<dyn Widget>)>,
}

impl CombinedWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dx: i32, dy: i32, child: impl Widget + 'static) -> Self {
        self.add(dx, dy, child);
        self
    }

    pub fn add(&mut self, dx: i32, dy: i32, child: impl Widget + 'static) {
        self.children.push((dx, dy, Box::new(child)));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Widget for CombinedWidget {
    fn size(&self, fonts: &CanvasFonts) -> (i32, i32) {
        let mut width = 0;
        let mut height = 0;
        for (dx, dy, child) in &self.children {
            let (w, h) = child.size(fonts);
            width = width.max(dx + w);
            height = height.max(dy + h);
        }
        (width, height)
    }

    fn render(&self, builder: &mut TextBuilder<'_>, x: i32, y: i32) {
        for (dx, dy, child) in &self.children {
            child.render(builder, x + dx, y + dy);
        }
    }

    fn state_hash(&self, state: &mut dyn Hasher) {
        state.write_usize(self.children.len());
        for (dx, dy, child) in &self.children {
            state.write_i32(*dx);
            state.write_i32(*dy);
            child.state_hash(state);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glyph_canvas_texture::{TextureIdent, TextureKind, TextureSession};
    use image::{Rgba, RgbaImage};
    use once_cell::sync::Lazy;

    static FONTS: Lazy<CanvasFonts> = Lazy::new(|| CanvasFonts::generate("test"));

    #[test]
    fn label_renders_its_text() {
        let label = LabelWidget::colored("Hi", Color::rgb(0x55ff55));
        let mut builder = TextBuilder::new(&FONTS);
        label.render(&mut builder, 10, 20);
        assert!(builder.build().flat_text().contains("Hi"));
    }

    #[test]
    fn label_size_is_measured_text() {
        let label = LabelWidget::new("Hi");
        let (w, h) = label.size(&FONTS);
        assert_eq!(w, FONTS.registry().standard().str_width("Hi", false));
        assert_eq!(h, FONTS.registry().standard().height());
    }

    #[test]
    fn image_widget_resolves_its_sliced_row() {
        let mut session = TextureSession::new("test");
        let texture = Arc::new(Texture::from_image(
            TextureIdent::new("test", "w.png"),
            TextureKind::Widget { target_y: 14 },
            RgbaImage::from_pixel(16, 8, Rgba([1, 1, 1, 255])),
            &mut session,
        ));
        let widget = ImageWidget::new(Arc::clone(&texture));

        let mut builder = TextBuilder::new(&FONTS);
        builder.set_origin(0, -6);
        // screen y 20 is title-relative 14, exactly the anchored row
        widget.render(&mut builder, 4, 20);
        let flat = builder.build().flat_text();
        assert!(flat.contains(texture.rows()[0].pieces()[0].ch()));
    }

    #[test]
    fn progress_widget_truncates_pieces() {
        let mut session = TextureSession::new("test");
        let texture = Arc::new(Texture::from_image(
            TextureIdent::new("test", "bar.png"),
            TextureKind::Icon,
            RgbaImage::from_pixel(300, 4, Rgba([1, 1, 1, 255])),
            &mut session,
        ));

        let half = ProgressWidget::with_progress(Arc::clone(&texture), 0.5);
        assert_eq!(half.pieces(), 2);

        let mut builder = TextBuilder::new(&FONTS);
        half.render(&mut builder, 0, 0);
        let flat = builder.build().flat_text();
        assert!(!flat.contains(texture.rows()[0].pieces()[2].ch()));
    }

    #[test]
    fn rect_widget_renders_tinted_solid() {
        let mut session = TextureSession::new("test");
        let texture = Arc::new(Texture::solid(
            20,
            4,
            TextureKind::Widget { target_y: 10 },
            &mut session,
        ));
        let rect = RectWidget::new(Arc::clone(&texture), Color::rgb(0x3366aa));

        let mut builder = TextBuilder::new(&FONTS);
        builder.set_origin(0, -6);
        rect.render(&mut builder, 4, 16);
        // the explicit tint never touches the builder's own color scope
        assert_eq!(builder.color(), DEFAULT_COLOR);
        let flat = builder.build().flat_text();
        assert!(flat.contains(texture.rows()[0].pieces()[0].ch()));
    }

    #[test]
    fn combined_widget_spans_its_children() {
        let combined = CombinedWidget::new()
            .with(0, 0, LabelWidget::new("ab"))
            .with(30, 10, LabelWidget::new("c"));
        let (w, h) = combined.size(&FONTS);
        assert_eq!(w, 30 + FONTS.registry().standard().str_width("c", false));
        assert_eq!(h, 10 + FONTS.registry().standard().height());
    }

    #[test]
    fn state_hash_tracks_content() {
        fn hash_of(widget: &dyn Widget) -> u64 {
            let mut hasher = twox_hash::XxHash64::default();
            widget.state_hash(&mut hasher);
            hasher.finish()
        }

        let a = LabelWidget::new("a");
        let b = LabelWidget::new("b");
        assert_ne!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a), hash_of(&LabelWidget::new("a")));
    }
}
