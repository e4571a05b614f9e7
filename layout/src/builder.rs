use crate::{
    font::{Font, FontIdent},
    group::{Style, TextGroup},
    rich_text::{Color, RichText},
    AbsoluteFontCollection, CanvasFonts,
};
use std::sync::Arc;

/// The mutable cursor and run accumulator for one render pass.
///
/// A builder lives for a single top-to-bottom, left-to-right pass on the
/// server tick thread: widgets position themselves with [`set_cursor`] /
/// [`set_y`], emit styled runs with [`print`], and the pass ends with
/// [`build`] compiling everything, in strict call order, into one
/// [`RichText`] value.
///
/// The tracked cursor must stay consistent with the emitted output; every
/// later [`set_cursor`] depends on it. The `*_unsafe` methods bypass that
/// bookkeeping and are only for glyph sequences that handle their own
/// positioning contiguously, paired with [`override_cursor`].
///
/// [`set_cursor`]: Self::set_cursor
/// [`set_y`]: Self::set_y
/// [`print`]: Self::print
/// [`build`]: Self::build
/// [`override_cursor`]: Self::override_cursor
#[derive(Debug)]
pub struct TextBuilder<'a> {
    fonts: &'a CanvasFonts,
    root: TextGroup,
    path: Vec<usize>,
    line: i32,
    cursor: i32,
    origin_x: i32,
    origin_y: i32,
    color: Color,
    title: Option<String>,
}

/// Color visible runs start out in.
pub const DEFAULT_COLOR: Color = Color::WHITE;

impl<'a> TextBuilder<'a> {
    pub fn new(fonts: &'a CanvasFonts) -> Self {
        Self {
            fonts,
            root: TextGroup::root(),
            path: Vec::new(),
            line: 0,
            cursor: 0,
            origin_x: 0,
            origin_y: 0,
            color: DEFAULT_COLOR,
            title: None,
        }
    }

    /// Sets the reference point later X/Y positioning calls are translated
    /// through.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    /// Current virtual line index.
    #[inline]
    pub fn line(&self) -> i32 {
        self.line
    }

    /// Tracked horizontal cursor, in title-relative pixels.
    #[inline]
    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    /// Repositions the virtual line directly. Emits nothing.
    pub fn set_line(&mut self, line: i32) {
        self.line = line;
    }

    /// Repositions by Y pixel, translated through the Y origin. Emits
    /// nothing.
    pub fn set_y(&mut self, y: i32) {
        self.line = AbsoluteFontCollection::convert_y_to_line(y + self.origin_y);
    }

    /// Scopes subsequent visible runs to a color. Every visible run pins its
    /// color explicitly, so a scope never leaks into later runs.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The title appended, at line 0 / cursor 0, when the pass compiles.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Moves the cursor to `x` (translated through the X origin), emitting
    /// exactly one movement run when the target differs from the tracked
    /// cursor. Idempotent at the same target.
    pub fn set_cursor(&mut self, x: i32) {
        self.goto(x + self.origin_x)
    }

    /// Moves the cursor by a relative pixel delta.
    pub fn move_cursor(&mut self, dx: i32) {
        self.goto(self.cursor + dx)
    }

    fn goto(&mut self, target: i32) {
        if target == self.cursor {
            return;
        }
        let movement = self.fonts.spacer().compose(self.cursor, target);
        if !movement.is_empty() {
            let style = Style::fonted(self.fonts.spacer().ident().clone());
            self.root.ensure_group(&mut self.path, &style);
            self.root.append(&self.path, &movement.chars);
        }
        self.cursor = movement.reached;
    }

    /// Emits one styled run in the current line's font and advances the
    /// tracked cursor by its measured width.
    pub fn print(&mut self, text: &str) {
        let font = Arc::clone(self.fonts.absolute().font_for_line(self.line));
        self.print_in_font(text, &font);
    }

    /// Emits one styled run in a registered font.
    pub fn print_with_font(&mut self, text: &str, ident: &FontIdent) {
        let font = Arc::clone(self.fonts.registry().get_or_standard(ident));
        self.print_in_font(text, &font);
    }

    fn print_in_font(&mut self, text: &str, font: &Arc<Font>) {
        if text.is_empty() {
            return;
        }
        let style = Style {
            color: Some(self.color),
            font: Some(font.ident().clone()),
        };
        self.root.ensure_group(&mut self.path, &style);
        self.root.append(&self.path, text);
        self.cursor += font.str_width(text, true);
    }

    /// Emits glyphs in a font without touching the tracked cursor. The
    /// caller owns consistency; see [`override_cursor`](Self::override_cursor).
    pub fn insert_unsafe(&mut self, text: &str, ident: &FontIdent) {
        self.insert_unsafe_colored(text, ident, self.color)
    }

    /// [`insert_unsafe`](Self::insert_unsafe) with an explicit color that
    /// overrides the builder's scoped color for this run only.
    pub fn insert_unsafe_colored(&mut self, text: &str, ident: &FontIdent, color: Color) {
        if text.is_empty() {
            return;
        }
        let style = Style {
            color: Some(color),
            font: Some(ident.clone()),
        };
        self.root.ensure_group(&mut self.path, &style);
        self.root.append(&self.path, text);
    }

    /// Emits a movement without touching the tracked cursor. Returns the
    /// delta actually encoded.
    pub fn move_cursor_unsafe(&mut self, dx: i32) -> i32 {
        let movement = self.fonts.spacer().compose(0, dx);
        if !movement.is_empty() {
            let style = Style::fonted(self.fonts.spacer().ident().clone());
            self.root.ensure_group(&mut self.path, &style);
            self.root.append(&self.path, &movement.chars);
        }
        movement.reached
    }

    /// Resets the tracked cursor without emitting anything, in the same
    /// title-relative domain [`cursor`](Self::cursor) reports. Pairs with the
    /// `*_unsafe` emitters.
    pub fn override_cursor(&mut self, cursor: i32) {
        self.cursor = cursor;
    }

    /// The font context this builder positions against.
    #[inline]
    pub fn fonts(&self) -> &'a CanvasFonts {
        self.fonts
    }

    /// Compiles all emitted runs, in call order, into one rich-text value.
    /// A title set on the builder is appended last at line 0 / cursor 0 in
    /// the line-0 font.
    pub fn build(mut self) -> RichText {
        if let Some(title) = self.title.take() {
            self.origin_x = 0;
            self.origin_y = 0;
            self.line = 0;
            self.goto(0);
            self.color = DEFAULT_COLOR;
            let font = Arc::clone(self.fonts.absolute().font_for_line(0));
            self.print_in_font(&title, &font);
        }
        self.root.build().unwrap_or_default()
    }
}
