use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::{fmt, sync::Arc};

/// Width in pixels assumed for characters absent from a font's width map and
/// every parent map.
pub const DEFAULT_CHAR_WIDTH: i32 = 6;

/// Nominal pixel height of the client's standard font.
pub const DEFAULT_CHAR_HEIGHT: i32 = 8;

/// Namespaced font identifier, e.g. `canvas:default`.
///
/// Cheap to clone; identifiers are shared between the registry, emitted text
/// runs and generated resource definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIdent(Arc<str>);

impl FontIdent {
    pub fn new(namespace: &str, path: &str) -> Self {
        Self(format!("{}:{}", namespace, path).into())
    }

    /// Parses a full `namespace:path` identifier.
    pub fn from_full(full: &str) -> Self {
        Self(full.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the `:` separator.
    pub fn namespace(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// The part after the `:` separator.
    pub fn path(&self) -> &str {
        self.0.splitn(2, ':').nth(1).unwrap_or("")
    }
}

impl fmt::Display for FontIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FontIdent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// What a font is used for. Kind-specific positioning data rides along here
/// instead of in subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKind {
    /// The client's standard font. Width lookups are never rescaled.
    Default,
    /// A generated per-line font carrying a vertical offset.
    LineHeight { line: i32 },
    /// A font whose characters encode horizontal movement.
    Spacer,
    /// A font holding sliced texture glyphs.
    Gui,
}

/// One renderable glyph set: an identifier plus per-character pixel widths,
/// falling back to a parent font for characters it does not register itself.
///
/// Immutable after construction; built via [`FontBuilder`].
#[derive(Debug)]
pub struct Font {
    ident: FontIdent,
    kind: FontKind,
    height: i32,
    /// Vertical offset baked into this font's resource definition.
    ascent: i32,
    widths: FxHashMap<char, i32>,
    parent: Option<Arc<Font>>,
}

impl Font {
    pub fn builder(ident: FontIdent, kind: FontKind) -> FontBuilder {
        FontBuilder {
            ident,
            kind,
            height: DEFAULT_CHAR_HEIGHT,
            ascent: DEFAULT_CHAR_HEIGHT - 1,
            widths: FxHashMap::default(),
            parent: None,
        }
    }

    /// The client's standard font with its well-known advance table, so text
    /// can be measured before anything else is registered.
    pub fn standard(namespace: &str) -> Self {
        let mut builder = Self::builder(FontIdent::new(namespace, "default"), FontKind::Default);
        for (c, w) in standard_widths() {
            builder = builder.width(c, w);
        }
        builder.build()
    }

    #[inline]
    pub fn ident(&self) -> &FontIdent {
        &self.ident
    }

    #[inline]
    pub fn kind(&self) -> FontKind {
        self.kind
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn ascent(&self) -> i32 {
        self.ascent
    }

    #[inline]
    pub fn parent(&self) -> Option<&Arc<Font>> {
        self.parent.as_ref()
    }

    /// The line index this font was generated for, if any.
    pub fn line(&self) -> Option<i32> {
        match self.kind {
            FontKind::LineHeight { line } => Some(line),
            _ => None,
        }
    }

    /// Rendered pixel width of one character.
    ///
    /// Resolution never fails: the font's own map, then the parent chain
    /// (unscaled), then [`DEFAULT_CHAR_WIDTH`]. With `scaled`, the width is
    /// adjusted for the client stretching glyph bitmaps to this font's
    /// declared height. The adjustment formula is a fixed protocol detail of
    /// the client renderer, not tunable behavior.
    pub fn width_of(&self, c: char, scaled: bool) -> i32 {
        let raw = self.raw_width(c);
        if scaled && self.kind != FontKind::Default && c != ' ' {
            scale_width(raw, self.height)
        } else {
            raw
        }
    }

    /// Rendered pixel width of a string. No kerning.
    pub fn str_width(&self, s: &str, scaled: bool) -> i32 {
        s.chars().map(|c| self.width_of(c, scaled)).sum()
    }

    fn raw_width(&self, c: char) -> i32 {
        if let Some(&w) = self.widths.get(&c) {
            w
        } else if let Some(parent) = &self.parent {
            parent.raw_width(c)
        } else {
            DEFAULT_CHAR_WIDTH
        }
    }

    /// Whether this font registers the character itself, ignoring parents.
    pub fn has_own_width(&self, c: char) -> bool {
        self.widths.contains_key(&c)
    }
}

/// Width adjustment applied when the client scales a glyph bitmap to the
/// font's declared pixel height.
#[inline]
fn scale_width(raw: i32, height: i32) -> i32 {
    (1.125 + (raw - 1) as f32 * height as f32 / 8.0).round() as i32
}

/// Constructs a [`Font`]. Widths may only be registered here; fonts are
/// read-only once built.
#[derive(Debug)]
pub struct FontBuilder {
    ident: FontIdent,
    kind: FontKind,
    height: i32,
    ascent: i32,
    widths: FxHashMap<char, i32>,
    parent: Option<Arc<Font>>,
}

impl FontBuilder {
    pub fn height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn ascent(mut self, ascent: i32) -> Self {
        self.ascent = ascent;
        self
    }

    pub fn width(mut self, c: char, width: i32) -> Self {
        self.widths.insert(c, width);
        self
    }

    pub fn parent(mut self, parent: Arc<Font>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn build(self) -> Font {
        Font {
            ident: self.ident,
            kind: self.kind,
            height: self.height,
            ascent: self.ascent,
            widths: self.widths,
            parent: self.parent,
        }
    }
}

/// Advance table of the client's standard font: 6px for most printable ASCII
/// with the usual narrow exceptions.
fn standard_widths() -> impl Iterator<Item = (char, i32)> {
    const EXCEPTIONS: &[(char, i32)] = &[
        (' ', 4),
        ('!', 2),
        ('"', 5),
        ('\'', 3),
        ('(', 5),
        (')', 5),
        ('*', 5),
        (',', 2),
        ('.', 2),
        (':', 2),
        (';', 2),
        ('<', 5),
        ('>', 5),
        ('@', 7),
        ('I', 4),
        ('[', 4),
        (']', 4),
        ('`', 3),
        ('f', 5),
        ('i', 2),
        ('k', 5),
        ('l', 3),
        ('t', 4),
        ('{', 5),
        ('|', 2),
        ('}', 5),
        ('~', 7),
    ];

    (' '..='~').map(|c| {
        let w = EXCEPTIONS
            .iter()
            .find(|(e, _)| *e == c)
            .map(|&(_, w)| w)
            .unwrap_or(DEFAULT_CHAR_WIDTH);
        (c, w)
    })
}
