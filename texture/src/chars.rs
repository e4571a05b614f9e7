use unicode_normalization::char::is_combining_mark;

/// Code points never handed out as piece characters.
///
/// The ranges encode client-specific glyph handling quirks (directionality
/// reordering, formatting triggers, discarded or reserved blocks). Treat the
/// table as a fixed constant of the wire format; do not tidy it.
const UNSAFE_POINTS: &[u32] = &[
    0x20,   // space collapses in titles
    0x5c,   // backslash, formatting trigger
    0xa0,   // no-break space
    0xad,   // soft hyphen
    0x603,  // Arabic sign safha
    0x38,   // '8', reserved for movement encoding
    0x39,   // '9', reserved for movement encoding
];

const UNSAFE_RANGES: &[(u32, u32)] = &[
    (0x00, 0x1f),       // C0 controls
    (0x7f, 0x81),       // DEL + C1 head
    (130, 140),         // reserved C1 block
    (155, 160),         // reserved C1 block
    (0x0590, 0x08ff),   // Hebrew through Arabic Extended, right-to-left
    (0x200e, 0x202e),   // directional formatting
    (0x2065, 0x2069),   // unassigned + directional isolates
    (0xfb1d, 0xfdff),   // Hebrew/Arabic presentation forms
    (0xfe70, 0xfeff),   // Arabic presentation forms B + BOM
];

/// Whether a code point may be assigned to a texture piece.
pub fn is_safe_char(c: char) -> bool {
    let point = c as u32;
    if UNSAFE_POINTS.contains(&point) {
        return false;
    }
    if UNSAFE_RANGES
        .iter()
        .any(|&(start, end)| point >= start && point <= end)
    {
        return false;
    }
    !is_combining_mark(c)
}
