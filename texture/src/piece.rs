use image::RgbaImage;

/// One bounded-width horizontal slice of a source image, mapped to a single
/// font character.
///
/// Owned by its parent texture; created in bulk when a row is sliced and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct TexturePiece {
    index: u32,
    ch: char,
    ascent: i32,
    image: RgbaImage,
}

impl TexturePiece {
    pub(crate) fn new(index: u32, ch: char, ascent: i32, image: RgbaImage) -> Self {
        Self {
            index,
            ch,
            ascent,
            image,
        }
    }

    /// 0-based position within its row, left to right.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The font character this slice renders as.
    #[inline]
    pub fn ch(&self) -> char {
        self.ch
    }

    /// Vertical offset of the slice's bitmap above the text baseline.
    #[inline]
    pub fn ascent(&self) -> i32 {
        self.ascent
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The raster emitted into the resource pack for this slice.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
