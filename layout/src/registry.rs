use crate::font::{Font, FontIdent, FontKind};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Process-wide font lookup, keyed by identifier.
///
/// Constructed once at startup, written to only while collections generate
/// their fonts, then shared read-only. Holds the standard font every fallback
/// chain bottoms out in.
#[derive(Debug)]
pub struct FontRegistry {
    namespace: String,
    fonts: FxHashMap<FontIdent, Arc<Font>>,
    standard: Arc<Font>,
}

impl FontRegistry {
    pub fn new(namespace: &str) -> Self {
        let standard = Arc::new(Font::standard(namespace));
        let mut fonts = FxHashMap::default();
        fonts.insert(standard.ident().clone(), Arc::clone(&standard));
        Self {
            namespace: namespace.to_owned(),
            fonts,
            standard,
        }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The client's standard font; the fallback for every failed lookup.
    #[inline]
    pub fn standard(&self) -> &Arc<Font> {
        &self.standard
    }

    /// Registers a font under its own identifier. Last registration wins.
    pub fn register(&mut self, font: Arc<Font>) -> Arc<Font> {
        self.fonts.insert(font.ident().clone(), Arc::clone(&font));
        font
    }

    pub fn get(&self, ident: &FontIdent) -> Option<&Arc<Font>> {
        self.fonts.get(ident)
    }

    /// Looks up a registered font, falling back to the standard font.
    pub fn get_or_standard(&self, ident: &FontIdent) -> &Arc<Font> {
        self.fonts.get(ident).unwrap_or(&self.standard)
    }

    /// Looks up the generated line-height font for a line index and gap,
    /// falling back to the standard font when that line was never generated.
    pub fn lh_font(&self, line: i32, line_gap: i32) -> &Arc<Font> {
        let ident = FontIdent::new(&self.namespace, &lh_path(line_gap, line));
        self.get_or_standard(&ident)
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Arc<Font>> {
        self.fonts.values()
    }

    /// All registered line-height fonts.
    pub fn line_fonts(&self) -> impl Iterator<Item = &Arc<Font>> {
        self.fonts
            .values()
            .filter(|f| matches!(f.kind(), FontKind::LineHeight { .. }))
    }
}

/// Resource path of the generated font for one (gap, line) pair.
pub(crate) fn lh_path(line_gap: i32, line: i32) -> String {
    format!("lh{}/{}", line_gap, line)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_ident_falls_back_to_standard() {
        let registry = FontRegistry::new("test");
        let missing = FontIdent::new("test", "nope");
        assert_eq!(
            registry.get_or_standard(&missing).ident(),
            registry.standard().ident()
        );
    }

    #[test]
    fn registration_is_looked_up_by_ident() {
        let mut registry = FontRegistry::new("test");
        let font = Arc::new(
            Font::builder(FontIdent::new("test", "extra"), FontKind::Gui)
                .width('x', 3)
                .build(),
        );
        registry.register(Arc::clone(&font));
        assert_eq!(
            registry.get(&FontIdent::new("test", "extra")).unwrap().ident(),
            font.ident()
        );
    }

    #[test]
    fn lh_lookup_without_generation_is_standard() {
        let registry = FontRegistry::new("test");
        assert_eq!(
            registry.lh_font(500, 0).ident(),
            registry.standard().ident()
        );
    }
}
