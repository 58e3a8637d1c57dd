//! Padding aux puissances de deux et découpage en sous-images carrées.

use texel_core::error::CoreError;
use texel_core::frame::{FrameBuffer, Rgb};
use texel_core::traits::PixelSource;

/// Couleur de remplissage des marges.
pub const PADDING_COLOR: Rgb = (255, 255, 255);

/// Smallest power of two `>= n`, starting at 1.
///
/// # Example
/// ```
/// use texel_ascii::tiler::next_power_of_two;
/// assert_eq!(next_power_of_two(10), 16);
/// assert_eq!(next_power_of_two(16), 16);
/// assert_eq!(next_power_of_two(17), 32);
/// assert_eq!(next_power_of_two(0), 1);
/// ```
#[must_use]
pub fn next_power_of_two(n: u32) -> u32 {
    let mut padded = 1u32;
    while padded < n {
        padded *= 2;
    }
    padded
}

/// Image centrée dans un canvas aux dimensions puissances de deux.
///
/// # Example
/// ```
/// use texel_core::frame::FrameBuffer;
/// use texel_ascii::tiler::pad;
/// let canvas = pad(&FrameBuffer::new(10, 17));
/// assert_eq!((canvas.width(), canvas.height()), (16, 32));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedCanvas {
    frame: FrameBuffer,
}

impl PaddedCanvas {
    /// Largeur paddée.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.frame.width
    }

    /// Hauteur paddée.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Underlying pixels.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

/// Pad `image` to power-of-two dimensions, centered on a white background.
///
/// Leftover odd pixels of margin go to the right/bottom side.
#[must_use]
pub fn pad(image: &impl PixelSource) -> PaddedCanvas {
    let (width, height) = (image.width(), image.height());
    let padded_width = next_power_of_two(width);
    let padded_height = next_power_of_two(height);

    let offset_x = (padded_width - width) / 2;
    let offset_y = (padded_height - height) / 2;

    let mut frame = FrameBuffer::filled(padded_width, padded_height, PADDING_COLOR);
    for row in 0..height {
        for col in 0..width {
            frame.set_pixel(offset_x + col, offset_y + row, image.pixel_at(row, col));
        }
    }

    log::trace!("pad {width}x{height} -> {padded_width}x{padded_height}");
    PaddedCanvas { frame }
}

/// Grille `rows × cols` de sous-images carrées, row-major.
#[derive(Clone, Debug)]
pub struct SubImageGrid {
    tiles: Vec<FrameBuffer>,
    rows: u32,
    cols: u32,
    side: u32,
}

impl SubImageGrid {
    /// Nombre de lignes de sous-images.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Nombre de colonnes (= résolution).
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Côté d'une sous-image en pixels.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Sub-image at `row`, `col`.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> &FrameBuffer {
        &self.tiles[row as usize * self.cols as usize + col as usize]
    }

    /// All sub-images, row-major.
    pub fn iter(&self) -> impl Iterator<Item = &FrameBuffer> {
        self.tiles.iter()
    }
}

/// Split `canvas` into `resolution` columns of square sub-images.
///
/// # Errors
/// Returns [`CoreError::InvalidResolution`] when `resolution` is zero or does
/// not evenly divide the padded width.
///
/// # Example
/// ```
/// use texel_core::frame::FrameBuffer;
/// use texel_ascii::tiler::{pad, tile};
/// let canvas = pad(&FrameBuffer::new(256, 128));
/// let grid = tile(&canvas, 4).unwrap();
/// assert_eq!((grid.rows(), grid.cols(), grid.side()), (2, 4, 64));
/// assert!(tile(&canvas, 3).is_err());
/// ```
pub fn tile(canvas: &PaddedCanvas, resolution: u32) -> Result<SubImageGrid, CoreError> {
    let padded_width = canvas.width();
    let invalid = CoreError::InvalidResolution {
        resolution,
        padded_width,
    };
    if resolution == 0 || padded_width % resolution != 0 {
        return Err(invalid);
    }
    let side = padded_width / resolution;
    if side == 0 {
        return Err(invalid);
    }

    let rows = canvas.height() / side;
    let cols = resolution;
    let mut tiles = Vec::with_capacity(rows as usize * cols as usize);

    for i in 0..rows {
        for j in 0..cols {
            let (start_y, start_x) = (i * side, j * side);
            let mut sub = FrameBuffer::new(side, side);
            for y in 0..side {
                for x in 0..side {
                    sub.set_pixel(x, y, canvas.frame.pixel(start_x + x, start_y + y));
                }
            }
            tiles.push(sub);
        }
    }

    Ok(SubImageGrid {
        tiles,
        rows,
        cols,
        side,
    })
}
