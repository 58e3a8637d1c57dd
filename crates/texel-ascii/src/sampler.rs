use texel_core::traits::PixelSource;

use crate::tiler::SubImageGrid;

/// Poids BT.709 du canal rouge, en dix-millièmes.
pub const RED_WEIGHT: u32 = 2126;
/// Poids BT.709 du canal vert, en dix-millièmes.
pub const GREEN_WEIGHT: u32 = 7152;
/// Poids BT.709 du canal bleu, en dix-millièmes.
pub const BLUE_WEIGHT: u32 = 722;
/// Somme des trois poids.
pub const WEIGHT_SCALE: u32 = RED_WEIGHT + GREEN_WEIGHT + BLUE_WEIGHT;

const MAX_RGB: u64 = 255;

/// Mean perceptual luma of `image`, normalized to `[0, 1]`.
///
/// Luma is accumulated in integers, so a uniform white image yields exactly
/// `1.0`. An image without pixels yields `0.0`.
///
/// # Example
/// ```
/// use texel_core::frame::FrameBuffer;
/// use texel_ascii::sampler::sample_brightness;
/// assert_eq!(sample_brightness(&FrameBuffer::new(4, 4)), 0.0);
/// let white = FrameBuffer::filled(4, 4, (255, 255, 255));
/// assert_eq!(sample_brightness(&white), 1.0);
/// ```
#[must_use]
pub fn sample_brightness(image: &impl PixelSource) -> f64 {
    let (width, height) = (image.width(), image.height());
    let pixel_count = u64::from(width) * u64::from(height);
    if pixel_count == 0 {
        return 0.0;
    }

    let mut total: u64 = 0;
    for row in 0..height {
        for col in 0..width {
            let (r, g, b) = image.pixel_at(row, col);
            total += u64::from(u32::from(r) * RED_WEIGHT
                + u32::from(g) * GREEN_WEIGHT
                + u32::from(b) * BLUE_WEIGHT);
        }
    }

    let full_scale = pixel_count * MAX_RGB * u64::from(WEIGHT_SCALE);
    (total as f64 / full_scale as f64).clamp(0.0, 1.0)
}

/// Une luminosité par sous-image, même forme que la grille.
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessMatrix {
    values: Vec<f64>,
    rows: u32,
    cols: u32,
}

impl BrightnessMatrix {
    /// Nombre de lignes.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Nombre de colonnes.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Brightness of the sub-image at `row`, `col`.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> f64 {
        self.values[row as usize * self.cols as usize + col as usize]
    }
}

/// Reduce every sub-image of `grid` to its brightness.
///
/// # Example
/// ```
/// use texel_core::frame::FrameBuffer;
/// use texel_ascii::sampler::brightness_matrix;
/// use texel_ascii::tiler::{pad, tile};
/// let grid = tile(&pad(&FrameBuffer::new(4, 4)), 2).unwrap();
/// let matrix = brightness_matrix(&grid);
/// assert_eq!((matrix.rows(), matrix.cols()), (2, 2));
/// assert_eq!(matrix.get(1, 1), 0.0);
/// ```
#[must_use]
pub fn brightness_matrix(grid: &SubImageGrid) -> BrightnessMatrix {
    BrightnessMatrix {
        values: grid.iter().map(sample_brightness).collect(),
        rows: grid.rows(),
        cols: grid.cols(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texel_core::frame::FrameBuffer;

    #[test]
    fn pure_channels_follow_weights() {
        let red = FrameBuffer::filled(2, 2, (255, 0, 0));
        let green = FrameBuffer::filled(2, 2, (0, 255, 0));
        let blue = FrameBuffer::filled(2, 2, (0, 0, 255));
        assert!((sample_brightness(&red) - 0.2126).abs() < 1e-12);
        assert!((sample_brightness(&green) - 0.7152).abs() < 1e-12);
        assert!((sample_brightness(&blue) - 0.0722).abs() < 1e-12);
    }

    #[test]
    fn white_is_exactly_one() {
        for (w, h) in [(1, 1), (2, 1), (3, 1), (7, 1), (8, 8), (64, 64), (13, 5)] {
            let white = FrameBuffer::filled(w, h, (255, 255, 255));
            assert_eq!(sample_brightness(&white), 1.0, "blanc {w}x{h}");
        }
    }

    #[test]
    fn black_is_exactly_zero() {
        assert_eq!(sample_brightness(&FrameBuffer::new(5, 3)), 0.0);
    }

    #[test]
    fn white_tiles_of_padded_margin_are_one() {
        // 3x1 noir → canvas 4x1, la colonne de marge droite est blanche
        let grid = crate::tiler::tile(&crate::tiler::pad(&FrameBuffer::new(3, 1)), 4).unwrap();
        let matrix = brightness_matrix(&grid);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert_eq!(matrix.get(0, 2), 0.0);
        assert_eq!(matrix.get(0, 3), 1.0);
    }

    #[test]
    fn mean_over_pixels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set_pixel(1, 0, (255, 255, 255));
        assert!((sample_brightness(&fb) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn always_within_unit_range() {
        for v in (0..=255u16).step_by(15) {
            let v = v as u8;
            let fb = FrameBuffer::filled(3, 3, (v, 255 - v, v / 2));
            let b = sample_brightness(&fb);
            assert!((0.0..=1.0).contains(&b), "luminosité hors bornes : {b}");
        }
    }

    #[test]
    fn empty_image_is_black() {
        assert_eq!(sample_brightness(&FrameBuffer::new(0, 0)), 0.0);
    }
}
