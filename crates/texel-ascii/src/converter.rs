//! Orchestration pad → tile → sample → match, avec caches entre appels.
//!
//! Le `Converter` garde :
//! - le canvas paddé de la dernière image (identité `Arc::ptr_eq`),
//! - la matrice de luminosité pour la dernière résolution de cette image,
//! - le dernier `CharMatcher`, resynchronisé par ajouts/retraits incrémentaux.
//!
//! Un appel en échec laisse tous les caches dans un état valide.

use std::collections::BTreeSet;
use std::sync::Arc;

use texel_core::error::CoreError;
use texel_core::frame::{AsciiGrid, FrameBuffer};

use crate::glyph::GlyphBrightnessCache;
use crate::matcher::CharMatcher;
use crate::sampler::{BrightnessMatrix, brightness_matrix};
use crate::tiler::{PaddedCanvas, pad, tile};

/// Paramètres d'une conversion.
#[derive(Clone, Debug)]
pub struct ConvertRequest {
    /// Image source, partagée. Son pointeur sert de clé de cache.
    pub image: Arc<FrameBuffer>,
    /// Charset demandé, au moins un caractère.
    pub charset: BTreeSet<char>,
    /// Nombre de colonnes de sous-images.
    pub resolution: u32,
    /// Interroge le matcher avec `1 - b` au lieu de `b`.
    pub invert: bool,
}

/// Compteurs d'activité des caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Canvas paddés calculés (un par nouvelle image).
    pub canvas_builds: u64,
    /// Matrice de luminosité réutilisée telle quelle.
    pub brightness_hits: u64,
    /// Matrice de luminosité recalculée (nouvelle image ou résolution).
    pub brightness_misses: u64,
    /// Matchers construits de zéro.
    pub matcher_builds: u64,
    /// Conversions ayant modifié le charset d'un matcher existant.
    pub matcher_updates: u64,
}

#[derive(Debug)]
struct ImageCache {
    image: Arc<FrameBuffer>,
    canvas: PaddedCanvas,
    brightness: Option<(u32, BrightnessMatrix)>,
}

/// Stateful image → ASCII converter.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use texel_core::charset::charset_from_str;
/// use texel_core::frame::FrameBuffer;
/// use texel_ascii::converter::{ConvertRequest, Converter};
///
/// let mut converter = Converter::default();
/// let request = ConvertRequest {
///     image: Arc::new(FrameBuffer::new(2, 2)),
///     charset: charset_from_str(" #"),
///     resolution: 2,
///     invert: false,
/// };
/// let grid = converter.convert(&request).unwrap();
/// assert_eq!(grid.to_lines(), vec!["  ", "  "]);
///
/// converter.convert(&request).unwrap();
/// assert_eq!(converter.stats().brightness_hits, 1);
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    glyphs: GlyphBrightnessCache,
    image: Option<ImageCache>,
    matcher: Option<CharMatcher>,
    stats: CacheStats,
}

impl Converter {
    /// Converter using `glyphs` for raw character brightness.
    #[must_use]
    pub fn new(glyphs: GlyphBrightnessCache) -> Self {
        Self {
            glyphs,
            image: None,
            matcher: None,
            stats: CacheStats::default(),
        }
    }

    /// Convert `request.image` into a grid of `resolution` columns.
    ///
    /// # Errors
    /// - [`CoreError::InvalidCharset`] if the charset is empty.
    /// - [`CoreError::InvalidResolution`] if the resolution does not divide
    ///   the padded width.
    pub fn convert(&mut self, request: &ConvertRequest) -> Result<AsciiGrid, CoreError> {
        if request.charset.is_empty() {
            return Err(CoreError::InvalidCharset);
        }

        self.refresh_brightness(&request.image, request.resolution)?;
        self.sync_matcher(&request.charset)?;

        let (Some(matcher), Some((_, matrix))) = (
            self.matcher.as_ref(),
            self.image.as_ref().and_then(|c| c.brightness.as_ref()),
        ) else {
            return Err(CoreError::EmptyMatcher);
        };

        let mut grid = AsciiGrid::new(matrix.cols(), matrix.rows());
        for row in 0..matrix.rows() {
            for col in 0..matrix.cols() {
                let b = matrix.get(row, col);
                let b = if request.invert { 1.0 - b } else { b };
                grid.set(col, row, matcher.query(b)?);
            }
        }
        Ok(grid)
    }

    /// Met le matcher en phase avec `charset`.
    ///
    /// Les ajouts passent avant les retraits : le matcher ne se vide jamais
    /// en cours de route.
    fn sync_matcher(&mut self, charset: &BTreeSet<char>) -> Result<(), CoreError> {
        let Some(matcher) = self.matcher.as_mut() else {
            self.matcher = Some(CharMatcher::new(
                charset.iter().copied(),
                &mut self.glyphs,
            )?);
            self.stats.matcher_builds += 1;
            log::debug!("matcher construit ({} caractères)", charset.len());
            return Ok(());
        };

        let mut changed = false;
        for &ch in charset {
            changed |= matcher.add_char(ch, &mut self.glyphs);
        }
        for ch in matcher.charset() {
            if !charset.contains(&ch) {
                changed |= matcher.remove_char(ch);
            }
        }
        if changed {
            self.stats.matcher_updates += 1;
            log::debug!("matcher mis à jour ({} caractères)", matcher.len());
        }
        Ok(())
    }

    fn refresh_brightness(
        &mut self,
        image: &Arc<FrameBuffer>,
        resolution: u32,
    ) -> Result<(), CoreError> {
        let cache = match self.image.take() {
            Some(cache) if Arc::ptr_eq(&cache.image, image) => cache,
            _ => {
                self.stats.canvas_builds += 1;
                ImageCache {
                    image: Arc::clone(image),
                    canvas: pad(image.as_ref()),
                    brightness: None,
                }
            }
        };
        let cache = self.image.insert(cache);

        if let Some((cached_res, _)) = &cache.brightness
            && *cached_res == resolution
        {
            self.stats.brightness_hits += 1;
            log::debug!("cache luminosité : hit (résolution {resolution})");
            return Ok(());
        }

        self.stats.brightness_misses += 1;
        log::debug!("cache luminosité : miss (résolution {resolution})");
        let grid = tile(&cache.canvas, resolution)?;
        cache.brightness = Some((resolution, brightness_matrix(&grid)));
        Ok(())
    }

    /// Compteurs des caches depuis la création.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Matcher courant, absent avant la première conversion.
    #[must_use]
    pub fn matcher(&self) -> Option<&CharMatcher> {
        self.matcher.as_ref()
    }

    /// Cache de luminosité des glyphes.
    #[must_use]
    pub fn glyphs(&self) -> &GlyphBrightnessCache {
        &self.glyphs
    }
}
