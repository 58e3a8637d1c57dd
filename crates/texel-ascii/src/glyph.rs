//! Couverture des glyphes et mémoïsation de leur luminosité brute.

use std::collections::HashMap;

use texel_core::frame::{GLYPH_SIZE, GlyphBitmap};
use texel_core::traits::GlyphSource;

/// Nombre total de cellules d'un glyphe (16×16).
pub const GLYPH_CELLS: usize = GLYPH_SIZE * GLYPH_SIZE;

/// Fraction of "on" cells in `bitmap`, in `[0, 1]`.
///
/// # Example
/// ```
/// use texel_core::frame::GLYPH_SIZE;
/// use texel_ascii::glyph::coverage_ratio;
/// assert_eq!(coverage_ratio(&[[false; GLYPH_SIZE]; GLYPH_SIZE]), 0.0);
/// assert_eq!(coverage_ratio(&[[true; GLYPH_SIZE]; GLYPH_SIZE]), 1.0);
/// ```
#[must_use]
pub fn coverage_ratio(bitmap: &GlyphBitmap) -> f64 {
    let on = bitmap.iter().flatten().filter(|&&cell| cell).count();
    on as f64 / GLYPH_CELLS as f64
}

/// First code point covered by [`FONT8X8_ASCII`].
const FONT_FIRST: u32 = 0x20;

/// 8x8 bitmaps for U+0020..=U+007E, one byte per row, MSB = leftmost pixel.
#[rustfmt::skip]
const FONT8X8_ASCII: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x6C, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // #
    [0x30, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x30, 0x00], // $
    [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00], // %
    [0x38, 0x6C, 0x38, 0x76, 0xDC, 0xCC, 0x76, 0x00], // &
    [0x60, 0x60, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x18, 0x30, 0x60, 0x60, 0x60, 0x30, 0x18, 0x00], // (
    [0x60, 0x30, 0x18, 0x18, 0x18, 0x30, 0x60, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x30, 0x30, 0xFC, 0x30, 0x30, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x60], // ,
    [0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00], // .
    [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00], // /
    [0x7C, 0xC6, 0xCE, 0xDE, 0xF6, 0xE6, 0x7C, 0x00], // 0
    [0x30, 0x70, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00], // 1
    [0x78, 0xCC, 0x0C, 0x38, 0x60, 0xCC, 0xFC, 0x00], // 2
    [0x78, 0xCC, 0x0C, 0x38, 0x0C, 0xCC, 0x78, 0x00], // 3
    [0x1C, 0x3C, 0x6C, 0xCC, 0xFE, 0x0C, 0x1E, 0x00], // 4
    [0xFC, 0xC0, 0xF8, 0x0C, 0x0C, 0xCC, 0x78, 0x00], // 5
    [0x38, 0x60, 0xC0, 0xF8, 0xCC, 0xCC, 0x78, 0x00], // 6
    [0xFC, 0xCC, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00], // 7
    [0x78, 0xCC, 0xCC, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 8
    [0x78, 0xCC, 0xCC, 0x7C, 0x0C, 0x18, 0x70, 0x00], // 9
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x00], // :
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x60], // ;
    [0x18, 0x30, 0x60, 0xC0, 0x60, 0x30, 0x18, 0x00], // <
    [0x00, 0x00, 0xFC, 0x00, 0x00, 0xFC, 0x00, 0x00], // =
    [0x60, 0x30, 0x18, 0x0C, 0x18, 0x30, 0x60, 0x00], // >
    [0x78, 0xCC, 0x0C, 0x18, 0x30, 0x00, 0x30, 0x00], // ?
    [0x7C, 0xC6, 0xDE, 0xDE, 0xDE, 0xC0, 0x78, 0x00], // @
    [0x30, 0x78, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0x00], // A
    [0xFC, 0x66, 0x66, 0x7C, 0x66, 0x66, 0xFC, 0x00], // B
    [0x3C, 0x66, 0xC0, 0xC0, 0xC0, 0x66, 0x3C, 0x00], // C
    [0xF8, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0xF8, 0x00], // D
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x62, 0xFE, 0x00], // E
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x60, 0xF0, 0x00], // F
    [0x3C, 0x66, 0xC0, 0xC0, 0xCE, 0x66, 0x3E, 0x00], // G
    [0xCC, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0xCC, 0x00], // H
    [0x78, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // I
    [0x1E, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78, 0x00], // J
    [0xE6, 0x66, 0x6C, 0x78, 0x6C, 0x66, 0xE6, 0x00], // K
    [0xF0, 0x60, 0x60, 0x60, 0x62, 0x66, 0xFE, 0x00], // L
    [0xC6, 0xEE, 0xFE, 0xFE, 0xD6, 0xC6, 0xC6, 0x00], // M
    [0xC6, 0xE6, 0xF6, 0xDE, 0xCE, 0xC6, 0xC6, 0x00], // N
    [0x38, 0x6C, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x00], // O
    [0xFC, 0x66, 0x66, 0x7C, 0x60, 0x60, 0xF0, 0x00], // P
    [0x78, 0xCC, 0xCC, 0xCC, 0xDC, 0x78, 0x1C, 0x00], // Q
    [0xFC, 0x66, 0x66, 0x7C, 0x6C, 0x66, 0xE6, 0x00], // R
    [0x78, 0xCC, 0xE0, 0x70, 0x1C, 0xCC, 0x78, 0x00], // S
    [0xFC, 0xB4, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // T
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xFC, 0x00], // U
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // V
    [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00], // W
    [0xC6, 0xC6, 0x6C, 0x38, 0x38, 0x6C, 0xC6, 0x00], // X
    [0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x30, 0x78, 0x00], // Y
    [0xFE, 0xC6, 0x8C, 0x18, 0x32, 0x66, 0xFE, 0x00], // Z
    [0x78, 0x60, 0x60, 0x60, 0x60, 0x60, 0x78, 0x00], // [
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x02, 0x00], // \
    [0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x78, 0x00], // ]
    [0x10, 0x38, 0x6C, 0xC6, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
    [0x30, 0x30, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x76, 0x00], // a
    [0xE0, 0x60, 0x60, 0x7C, 0x66, 0x66, 0xDC, 0x00], // b
    [0x00, 0x00, 0x78, 0xCC, 0xC0, 0xCC, 0x78, 0x00], // c
    [0x1C, 0x0C, 0x0C, 0x7C, 0xCC, 0xCC, 0x76, 0x00], // d
    [0x00, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // e
    [0x38, 0x6C, 0x60, 0xF0, 0x60, 0x60, 0xF0, 0x00], // f
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // g
    [0xE0, 0x60, 0x6C, 0x76, 0x66, 0x66, 0xE6, 0x00], // h
    [0x30, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // i
    [0x0C, 0x00, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78], // j
    [0xE0, 0x60, 0x66, 0x6C, 0x78, 0x6C, 0xE6, 0x00], // k
    [0x70, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // l
    [0x00, 0x00, 0xCC, 0xFE, 0xFE, 0xD6, 0xC6, 0x00], // m
    [0x00, 0x00, 0xF8, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // n
    [0x00, 0x00, 0x78, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // o
    [0x00, 0x00, 0xDC, 0x66, 0x66, 0x7C, 0x60, 0xF0], // p
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0x1E], // q
    [0x00, 0x00, 0xDC, 0x76, 0x66, 0x60, 0xF0, 0x00], // r
    [0x00, 0x00, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x00], // s
    [0x10, 0x30, 0x7C, 0x30, 0x30, 0x34, 0x18, 0x00], // t
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0xCC, 0x76, 0x00], // u
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // v
    [0x00, 0x00, 0xC6, 0xD6, 0xFE, 0xFE, 0x6C, 0x00], // w
    [0x00, 0x00, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0x00], // x
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // y
    [0x00, 0x00, 0xFC, 0x98, 0x30, 0x64, 0xFC, 0x00], // z
    [0x1C, 0x30, 0x30, 0xE0, 0x30, 0x30, 0x1C, 0x00], // {
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // |
    [0xE0, 0x30, 0x30, 0x1C, 0x30, 0x30, 0xE0, 0x00], // }
    [0x76, 0xDC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];

/// Police bitmap 8×8 intégrée, agrandie ×2 vers 16×16.
///
/// Couvre l'ASCII imprimable. Tout autre caractère donne un glyphe vide.
///
/// # Example
/// ```
/// use texel_core::traits::GlyphSource;
/// use texel_ascii::glyph::{coverage_ratio, BuiltinGlyphs};
/// let glyphs = BuiltinGlyphs;
/// assert_eq!(coverage_ratio(&glyphs.coverage(' ')), 0.0);
/// assert!(coverage_ratio(&glyphs.coverage('@')) > coverage_ratio(&glyphs.coverage('.')));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinGlyphs;

impl GlyphSource for BuiltinGlyphs {
    fn coverage(&self, ch: char) -> GlyphBitmap {
        let mut bitmap = [[false; GLYPH_SIZE]; GLYPH_SIZE];
        let Some(rows) = (ch as u32)
            .checked_sub(FONT_FIRST)
            .and_then(|idx| FONT8X8_ASCII.get(idx as usize))
        else {
            return bitmap;
        };

        for (y, line) in bitmap.iter_mut().enumerate() {
            let bits = rows[y / 2];
            for (x, cell) in line.iter_mut().enumerate() {
                *cell = bits & (0x80 >> (x / 2)) != 0;
            }
        }
        bitmap
    }
}

/// Mémo `char → luminosité brute`, calculée au plus une fois par caractère.
///
/// Jamais invalidé : un glyphe ne change pas pour une source donnée.
///
/// # Example
/// ```
/// use texel_ascii::glyph::GlyphBrightnessCache;
/// let mut cache = GlyphBrightnessCache::default();
/// let b = cache.brightness('#');
/// assert!(b > 0.0 && b < 1.0);
/// assert_eq!(cache.len(), 1);
/// ```
pub struct GlyphBrightnessCache {
    source: Box<dyn GlyphSource>,
    memo: HashMap<char, f64>,
}

impl GlyphBrightnessCache {
    /// Cache backed by `source`.
    #[must_use]
    pub fn new(source: Box<dyn GlyphSource>) -> Self {
        Self {
            source,
            memo: HashMap::new(),
        }
    }

    /// Raw brightness of `ch`: on-cells / 256.
    pub fn brightness(&mut self, ch: char) -> f64 {
        if let Some(&b) = self.memo.get(&ch) {
            return b;
        }
        let b = coverage_ratio(&self.source.coverage(ch));
        log::trace!("glyphe {ch:?} : luminosité brute {b}");
        self.memo.insert(ch, b);
        b
    }

    /// Nombre de caractères mémoïsés.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// `true` tant qu'aucun glyphe n'a été calculé.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

impl Default for GlyphBrightnessCache {
    fn default() -> Self {
        Self::new(Box::new(BuiltinGlyphs))
    }
}

impl std::fmt::Debug for GlyphBrightnessCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphBrightnessCache")
            .field("memo", &self.memo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Glyph source with a fixed number of on-cells per char, counting calls.
    pub(crate) struct FixedGlyphs {
        pub(crate) counts: HashMap<char, usize>,
        pub(crate) calls: Rc<Cell<usize>>,
    }

    impl FixedGlyphs {
        pub(crate) fn new(counts: &[(char, usize)]) -> Self {
            Self {
                counts: counts.iter().copied().collect(),
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl GlyphSource for FixedGlyphs {
        fn coverage(&self, ch: char) -> GlyphBitmap {
            self.calls.set(self.calls.get() + 1);
            let on = self.counts.get(&ch).copied().unwrap_or(0);
            let mut bitmap = [[false; GLYPH_SIZE]; GLYPH_SIZE];
            for cell in bitmap.iter_mut().flatten().take(on) {
                *cell = true;
            }
            bitmap
        }
    }

    #[test]
    fn builtin_covers_printable_ascii_only() {
        assert_eq!(FONT8X8_ASCII.len(), ('~' as usize) - (' ' as usize) + 1);
        let empty = [[false; GLYPH_SIZE]; GLYPH_SIZE];
        assert_eq!(BuiltinGlyphs.coverage('é'), empty);
        assert_eq!(BuiltinGlyphs.coverage('\n'), empty);
        assert_ne!(BuiltinGlyphs.coverage('~'), empty);
    }

    #[test]
    fn builtin_upscale_keeps_ratio() {
        // '_' : une ligne pleine sur 8 → 32 cellules sur 256
        assert_eq!(coverage_ratio(&BuiltinGlyphs.coverage('_')), 32.0 / 256.0);
        let bitmap = BuiltinGlyphs.coverage('_');
        assert!(bitmap[15].iter().all(|&c| c));
        assert!(bitmap[14].iter().all(|&c| c));
        assert!(bitmap[13].iter().all(|&c| !c));
    }

    #[test]
    fn cache_computes_each_char_once() {
        let source = FixedGlyphs::new(&[('a', 64)]);
        let calls = Rc::clone(&source.calls);
        let mut cache = GlyphBrightnessCache::new(Box::new(source));
        assert!(cache.is_empty());
        assert_eq!(cache.brightness('a'), 0.25);
        assert_eq!(cache.brightness('a'), 0.25);
        assert_eq!(cache.brightness('b'), 0.0);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }
}
