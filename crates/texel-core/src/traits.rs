use crate::frame::{FrameBuffer, GlyphBitmap, Rgb};

/// Image en lecture seule consommée par le pipeline.
///
/// Implémenté par : `FrameBuffer`. Le décodage reste hors du cœur.
///
/// # Example
/// ```
/// use texel_core::traits::PixelSource;
/// use texel_core::frame::Rgb;
///
/// struct Checker;
/// impl PixelSource for Checker {
///     fn width(&self) -> u32 { 2 }
///     fn height(&self) -> u32 { 2 }
///     fn pixel_at(&self, row: u32, col: u32) -> Rgb {
///         if (row + col) % 2 == 0 { (0, 0, 0) } else { (255, 255, 255) }
///     }
/// }
/// assert_eq!(Checker.pixel_at(0, 1), (255, 255, 255));
/// ```
pub trait PixelSource {
    /// Largeur en pixels.
    fn width(&self) -> u32;

    /// Hauteur en pixels.
    fn height(&self) -> u32;

    /// Pixel at `row`, `col`. Callers stay within `height() × width()`.
    fn pixel_at(&self, row: u32, col: u32) -> Rgb;
}

impl PixelSource for FrameBuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel_at(&self, row: u32, col: u32) -> Rgb {
        self.pixel(col, row)
    }
}

/// Fournit la couverture 16×16 d'un glyphe.
///
/// Traité comme une fonction pure : le résultat pour un caractère donné ne
/// change jamais, ce qui autorise la mémoïsation.
///
/// # Example
/// ```
/// use texel_core::traits::GlyphSource;
/// use texel_core::frame::{GlyphBitmap, GLYPH_SIZE};
///
/// struct Solid;
/// impl GlyphSource for Solid {
///     fn coverage(&self, _ch: char) -> GlyphBitmap { [[true; GLYPH_SIZE]; GLYPH_SIZE] }
/// }
/// assert!(Solid.coverage('x')[0][0]);
/// ```
pub trait GlyphSource {
    /// Bitmap de couverture du caractère, row-major.
    fn coverage(&self, ch: char) -> GlyphBitmap;
}
