use crate::font::FontIdent;
use serde::{Serialize, Serializer};
use std::fmt;

/// An RGB text color, serialized in the `#rrggbb` form the client's
/// component format expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xff_ff_ff);
    pub const BLACK: Color = Color(0x00_00_00);
    pub const GRAY: Color = Color(0xaa_aa_aa);

    #[inline]
    pub const fn rgb(rgb: u32) -> Self {
        Color(rgb & 0x00ff_ffff)
    }

    #[inline]
    pub const fn as_rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// One compiled rich-text node: literal text plus optional style, with
/// ordered child nodes inheriting unset style fields.
///
/// This is the final wire value a render pass produces; the screen-handler
/// layer transmits its JSON form as the screen title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontIdent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RichText>,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// No text in this node or any child.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.extra.iter().all(RichText::is_empty)
    }

    /// All literal characters in document order, styles ignored.
    pub fn flat_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.extra {
            child.collect_text(out);
        }
    }

    /// The component JSON the client parses as a screen title.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
