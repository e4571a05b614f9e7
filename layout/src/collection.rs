use crate::{
    font::{Font, FontIdent, FontKind, DEFAULT_CHAR_HEIGHT},
    registry::{lh_path, FontRegistry},
};
use rustc_hash::FxHashMap;
use std::{ops::Range, sync::Arc};

/// Ascent of the client's standard font glyphs above the title baseline.
pub const BASELINE_ASCENT: i32 = 7;

/// Fixed calibration between a title-relative Y pixel and the absolute
/// collection's line index.
pub const ABSOLUTE_Y_OFFSET: i32 = 6;

/// Line range generated by [`AbsoluteFontCollection`].
pub const ABSOLUTE_LINE_RANGE: Range<i32> = -110..200;

fn generate_line_fonts(
    namespace: &str,
    range: Range<i32>,
    font_height: i32,
    line_to_y: impl Fn(i32) -> i32,
    path: impl Fn(i32) -> String,
    registry: &mut FontRegistry,
) -> FxHashMap<i32, Arc<Font>> {
    let standard = Arc::clone(registry.standard());
    let mut fonts = FxHashMap::default();
    for line in range {
        let font = Font::builder(
            FontIdent::new(namespace, &path(line)),
            FontKind::LineHeight { line },
        )
        .height(font_height)
        .ascent(BASELINE_ASCENT - line_to_y(line))
        .parent(Arc::clone(&standard))
        .build();
        fonts.insert(line, registry.register(Arc::new(font)));
    }
    fonts
}

/// A family of fonts, one per discrete vertical line, realizing arbitrary Y
/// positions through per-line ascent adjustments.
///
/// Generated eagerly at construction and read-only afterwards. Lookups for
/// lines outside the generated range fall back to the standard font; nothing
/// is generated on demand.
#[derive(Debug)]
pub struct LineHeightFontCollection {
    char_height: i32,
    line_gap: i32,
    top_margin: i32,
    range: Range<i32>,
    fonts: FxHashMap<i32, Arc<Font>>,
    first: Arc<Font>,
    standard: Arc<Font>,
}

impl LineHeightFontCollection {
    /// Generates one font per line over `range`, registering each.
    ///
    /// `char_height + line_gap` must be positive; a zero line stride is a
    /// construction bug, not a runtime condition.
    pub fn generate(
        namespace: &str,
        char_height: i32,
        line_gap: i32,
        top_margin: i32,
        range: Range<i32>,
        registry: &mut FontRegistry,
    ) -> Self {
        assert!(
            char_height + line_gap > 0,
            "line stride must be positive (char_height {} + line_gap {})",
            char_height,
            line_gap,
        );
        assert!(!range.is_empty(), "empty line range");

        let stride = char_height + line_gap;
        let fonts = generate_line_fonts(
            namespace,
            range.clone(),
            char_height,
            |line| line * stride + top_margin,
            |line| lh_path(line_gap, line),
            registry,
        );
        let first = Arc::clone(&fonts[&range.start]);
        Self {
            char_height,
            line_gap,
            top_margin,
            range,
            fonts,
            first,
            standard: Arc::clone(registry.standard()),
        }
    }

    #[inline]
    pub fn char_height(&self) -> i32 {
        self.char_height
    }

    #[inline]
    pub fn line_gap(&self) -> i32 {
        self.line_gap
    }

    #[inline]
    pub fn range(&self) -> Range<i32> {
        self.range.clone()
    }

    /// The font generated for the first line of the range.
    #[inline]
    pub fn first(&self) -> &Arc<Font> {
        &self.first
    }

    /// Maps a title-relative Y pixel to a line index. Integer division
    /// truncates toward zero, matching the generated resource files.
    #[inline]
    pub fn convert_y_to_line(&self, y: i32) -> i32 {
        (y - self.top_margin) / (self.char_height + self.line_gap)
    }

    /// Inverse of [`convert_y_to_line`](Self::convert_y_to_line) over the
    /// generated range.
    #[inline]
    pub fn line_to_y(&self, line: i32) -> i32 {
        line * (self.char_height + self.line_gap) + self.top_margin
    }

    /// The generated font for a line, or the standard font outside the range.
    pub fn font_for_line(&self, line: i32) -> &Arc<Font> {
        self.fonts.get(&line).unwrap_or(&self.standard)
    }

    /// The generated font closest to a Y pixel.
    pub fn closest_font(&self, y: i32) -> &Arc<Font> {
        self.font_for_line(self.convert_y_to_line(y))
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Arc<Font>> {
        self.fonts.values()
    }
}

/// The line-height collection covering a wide absolute range of Y pixels at
/// single-pixel granularity; the base for all vertical positioning.
#[derive(Debug)]
pub struct AbsoluteFontCollection {
    fonts: FxHashMap<i32, Arc<Font>>,
    first: Arc<Font>,
    standard: Arc<Font>,
}

impl AbsoluteFontCollection {
    pub fn generate(namespace: &str, registry: &mut FontRegistry) -> Self {
        let fonts = generate_line_fonts(
            namespace,
            ABSOLUTE_LINE_RANGE,
            DEFAULT_CHAR_HEIGHT,
            Self::line_to_y,
            |line| format!("abs/{}", line),
            registry,
        );
        let first = Arc::clone(&fonts[&ABSOLUTE_LINE_RANGE.start]);
        Self {
            fonts,
            first,
            standard: Arc::clone(registry.standard()),
        }
    }

    #[inline]
    pub fn first(&self) -> &Arc<Font> {
        &self.first
    }

    #[inline]
    pub fn convert_y_to_line(y: i32) -> i32 {
        y - ABSOLUTE_Y_OFFSET
    }

    #[inline]
    pub fn line_to_y(line: i32) -> i32 {
        line + ABSOLUTE_Y_OFFSET
    }

    /// The generated font for a line, or the standard font outside
    /// [`ABSOLUTE_LINE_RANGE`].
    pub fn font_for_line(&self, line: i32) -> &Arc<Font> {
        self.fonts.get(&line).unwrap_or(&self.standard)
    }

    pub fn closest_font(&self, y: i32) -> &Arc<Font> {
        self.font_for_line(Self::convert_y_to_line(y))
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Arc<Font>> {
        self.fonts.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn absolute() -> (FontRegistry, AbsoluteFontCollection) {
        let mut registry = FontRegistry::new("test");
        let collection = AbsoluteFontCollection::generate("test", &mut registry);
        (registry, collection)
    }

    #[test]
    fn absolute_line_round_trip() {
        for line in ABSOLUTE_LINE_RANGE {
            assert_eq!(
                AbsoluteFontCollection::convert_y_to_line(AbsoluteFontCollection::line_to_y(line)),
                line
            );
        }
    }

    #[test]
    fn absolute_fonts_embed_line_in_ident() {
        let (_, collection) = absolute();
        let font = collection.font_for_line(-12);
        assert_eq!(font.ident().as_str(), "test:abs/-12");
        assert_eq!(font.line(), Some(-12));
    }

    #[test]
    fn out_of_range_line_falls_back_to_standard() {
        let (registry, collection) = absolute();
        assert_eq!(
            collection.font_for_line(500).ident(),
            registry.standard().ident()
        );
    }

    #[test]
    fn ascent_decreases_as_line_increases() {
        let (_, collection) = absolute();
        let high = collection.font_for_line(-10).ascent();
        let low = collection.font_for_line(10).ascent();
        assert!(high > low);
        assert_eq!(high - low, 20);
    }

    #[test]
    fn generated_fonts_inherit_standard_widths() {
        let (registry, collection) = absolute();
        let font = collection.font_for_line(3);
        assert_eq!(
            font.width_of('i', false),
            registry.standard().width_of('i', false)
        );
    }

    #[test]
    fn gapped_collection_round_trip() {
        let mut registry = FontRegistry::new("test");
        let collection =
            LineHeightFontCollection::generate("test", 8, 2, 4, -10..20, &mut registry);
        for line in collection.range() {
            assert_eq!(collection.convert_y_to_line(collection.line_to_y(line)), line);
        }
    }

    #[test]
    fn y_conversion_truncates_toward_zero() {
        let mut registry = FontRegistry::new("test");
        let collection = LineHeightFontCollection::generate("test", 8, 0, 0, -10..20, &mut registry);
        // Java-style truncation: -7 / 8 == 0, not -1.
        assert_eq!(collection.convert_y_to_line(-7), 0);
        assert_eq!(collection.convert_y_to_line(-8), -1);
        assert_eq!(collection.convert_y_to_line(7), 0);
        assert_eq!(collection.convert_y_to_line(8), 1);
    }

    #[test]
    fn registry_lh_lookup_resolves_generated_lines() {
        let mut registry = FontRegistry::new("test");
        let collection =
            LineHeightFontCollection::generate("test", 8, 2, 4, -10..20, &mut registry);
        assert_eq!(
            registry.lh_font(5, 2).ident(),
            collection.font_for_line(5).ident()
        );
        // gap mismatch resolves to the fallback, not a neighbouring family
        assert_eq!(
            registry.lh_font(5, 3).ident(),
            registry.standard().ident()
        );
    }

    #[test]
    fn first_is_range_start() {
        let mut registry = FontRegistry::new("test");
        let collection =
            LineHeightFontCollection::generate("test", 8, 0, 0, -10..20, &mut registry);
        assert_eq!(collection.first().line(), Some(-10));
    }

    #[test]
    #[should_panic]
    fn zero_stride_is_a_construction_bug() {
        let mut registry = FontRegistry::new("test");
        LineHeightFontCollection::generate("test", 0, 0, 0, 0..10, &mut registry);
    }
}
