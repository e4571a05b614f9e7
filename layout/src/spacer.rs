use crate::font::{Font, FontIdent, FontKind};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The default movement catalog.
///
/// Positive steps are an alternate-Fibonacci ladder for fast convergence;
/// negative steps are exact small deltas plus a coarse tens ladder. The
/// catalog and its greedy application order are part of the output format:
/// changing either changes every emitted title string.
pub const DEFAULT_MOVEMENTS: &[(char, i32)] = &[
    ('1', 2584),
    ('2', 987),
    ('3', 377),
    ('4', 144),
    ('5', 55),
    ('6', 21),
    ('7', 8),
    ('8', 3),
    ('9', 1),
    ('a', -1),
    ('b', -2),
    ('c', -3),
    ('d', -4),
    ('e', -5),
    ('f', -6),
    ('g', -7),
    ('h', -8),
    ('i', -9),
    ('j', -10),
    ('k', -20),
    ('l', -30),
    ('m', -40),
    ('n', -50),
];

/// The character sequence produced for one horizontal movement, together with
/// the position it actually reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub chars: String,
    pub reached: i32,
}

impl Movement {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// A font whose characters represent signed horizontal cursor movements
/// rather than visible glyphs.
///
/// Composition is a greedy walk over a hand-picked non-canonical step
/// catalog. It is not an optimal solver; when a delta cannot be reached
/// exactly the walk stops as close as the catalog allows, which is an
/// accepted approximation rather than an error.
#[derive(Debug)]
pub struct SpacerFont {
    font: Arc<Font>,
    by_width: FxHashMap<i32, char>,
    /// Negative steps, most negative first.
    negative: Vec<(i32, char)>,
    /// Positive steps, largest first.
    positive: Vec<(i32, char)>,
}

impl SpacerFont {
    /// Builds the movement font from [`DEFAULT_MOVEMENTS`].
    pub fn generate(ident: FontIdent) -> Self {
        Self::with_catalog(ident, DEFAULT_MOVEMENTS)
    }

    /// Builds a movement font from an explicit catalog.
    ///
    /// Every width must map to exactly one character and zero is not a
    /// movement; violations are construction bugs and fail hard.
    pub fn with_catalog(ident: FontIdent, catalog: &[(char, i32)]) -> Self {
        let mut builder = Font::builder(ident, FontKind::Spacer);
        let mut by_width = FxHashMap::default();
        let mut negative = Vec::new();
        let mut positive = Vec::new();

        for &(c, width) in catalog {
            assert!(width != 0, "zero-width movement registered for {:?}", c);
            let clash = by_width.insert(width, c);
            assert!(
                clash.is_none(),
                "movement width {} registered twice ({:?}, {:?})",
                width,
                clash.unwrap(),
                c,
            );
            builder = builder.width(c, width);
            if width < 0 {
                negative.push((width, c));
            } else {
                positive.push((width, c));
            }
        }

        negative.sort_by_key(|&(w, _)| w);
        positive.sort_by_key(|&(w, _)| std::cmp::Reverse(w));

        Self {
            font: Arc::new(builder.build()),
            by_width,
            negative,
            positive,
        }
    }

    #[inline]
    pub fn font(&self) -> &Arc<Font> {
        &self.font
    }

    #[inline]
    pub fn ident(&self) -> &FontIdent {
        self.font.ident()
    }

    /// Registered movement widths and their characters, in no particular
    /// order.
    pub fn catalog(&self) -> impl Iterator<Item = (i32, char)> + '_ {
        self.by_width.iter().map(|(&w, &c)| (w, c))
    }

    /// Composes the character sequence moving the cursor from `current`
    /// toward `wanted` without overshooting past it.
    pub fn compose(&self, current: i32, wanted: i32) -> Movement {
        let mut chars = String::new();
        let mut at = current;

        if wanted < current {
            // A single exact step wins outright.
            if let Some(&c) = self.by_width.get(&(wanted - current)) {
                return Movement {
                    chars: c.to_string(),
                    reached: wanted,
                };
            }
            // Largest single step that stays at or right of the target.
            for &(w, c) in &self.negative {
                if at + w >= wanted {
                    chars.push(c);
                    at += w;
                    break;
                }
            }
            // Close the remainder, each step applied as often as it fits.
            for &(w, c) in &self.negative {
                while at + w >= wanted {
                    chars.push(c);
                    at += w;
                }
            }
        } else if wanted > current {
            for &(w, c) in &self.positive {
                while at + w <= wanted {
                    chars.push(c);
                    at += w;
                }
            }
        }

        Movement { chars, reached: at }
    }
}
