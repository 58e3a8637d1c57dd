//! Couverture de glyphes depuis une police TrueType/OpenType.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, point};
use anyhow::{Context, Result};
use texel_core::frame::{GLYPH_SIZE, GlyphBitmap};
use texel_core::traits::GlyphSource;

/// Seuil de couverture d'une cellule allumée.
const COVERAGE_THRESHOLD: f32 = 0.5;

/// Police vectorielle rasterisée en 16×16.
///
/// Un caractère absent de la police (glyph id 0) donne un glyphe vide.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use texel_core::traits::GlyphSource;
/// use texel_render::font::FontGlyphs;
/// let font = FontGlyphs::load(Path::new("DejaVuSansMono.ttf")).unwrap();
/// let bitmap = font.coverage('@');
/// ```
pub struct FontGlyphs {
    font: FontVec,
    scale: PxScale,
    ascent_px: f32,
}

impl FontGlyphs {
    /// Parse a font from raw bytes.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        let scale = PxScale::from(GLYPH_SIZE as f32);
        let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
        Ok(Self {
            font,
            scale,
            ascent_px,
        })
    }

    /// Load a font file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid font.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let glyphs = Self::from_bytes(data)
            .with_context(|| format!("Police illisible : {}", path.display()))?;
        log::info!("Police chargée : {}", path.display());
        Ok(glyphs)
    }
}

impl GlyphSource for FontGlyphs {
    fn coverage(&self, ch: char) -> GlyphBitmap {
        let mut bitmap = [[false; GLYPH_SIZE]; GLYPH_SIZE];

        let gid = self.font.glyph_id(ch);
        if gid.0 == 0 {
            log::debug!("glyphe {ch:?} absent de la police");
            return bitmap;
        }

        let glyph = gid.with_scale_and_position(self.scale, point(0.0, self.ascent_px));
        if let Some(outline) = self.font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, v| {
                if v < COVERAGE_THRESHOLD {
                    return;
                }
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if (0..GLYPH_SIZE as i32).contains(&px) && (0..GLYPH_SIZE as i32).contains(&py) {
                    bitmap[py as usize][px as usize] = true;
                }
            });
        }
        bitmap
    }
}

impl std::fmt::Debug for FontGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontGlyphs")
            .field("scale", &self.scale.y)
            .finish_non_exhaustive()
    }
}
