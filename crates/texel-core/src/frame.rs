/// Couleur RGB, un octet par canal.
pub type Rgb = (u8, u8, u8);

/// Side length of a glyph coverage bitmap, in cells.
pub const GLYPH_SIZE: usize = 16;

/// Coverage bitmap of a rendered glyph, row-major. `true` = cell "on".
pub type GlyphBitmap = [[bool; GLYPH_SIZE]; GLYPH_SIZE];

/// Buffer de pixels RGB immuable une fois construit.
///
/// Stocke les pixels en RGB row-major, 3 bytes par pixel.
///
/// # Example
/// ```
/// use texel_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGB, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use texel_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 3);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 3],
            width,
            height,
        }
    }

    /// Crée un buffer rempli d'une couleur unie.
    ///
    /// # Example
    /// ```
    /// use texel_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, (255, 255, 255));
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap raw RGB bytes. Returns `None` if `data` does not hold exactly
    /// `width * height` pixels.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() == width as usize * height as usize * 3 {
            Some(Self {
                data,
                width,
                height,
            })
        } else {
            None
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Accès au pixel (x, y) → (r, g, b).
    ///
    /// # Example
    /// ```
    /// use texel_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0));
    /// ```
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = self.index(x, y);
        if idx + 2 >= self.data.len() {
            return (0, 0, 0);
        }
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Écrit le pixel (x, y). Hors limites : no-op.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx] = color.0;
        self.data[idx + 1] = color.1;
        self.data[idx + 2] = color.2;
    }
}

/// Grille de sortie ASCII, row-major.
///
/// # Example
/// ```
/// use texel_core::frame::AsciiGrid;
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, '@');
/// assert_eq!(grid.get(0, 0), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of characters, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie d'espaces.
    ///
    /// # Example
    /// ```
    /// use texel_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set the character at column `x`, row `y`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Character at column `x`, row `y`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over rows as slices.
    ///
    /// # Example
    /// ```
    /// use texel_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(3, 2);
    /// assert_eq!(grid.rows().count(), 2);
    /// ```
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Render every row as a `String`.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.rows().map(|row| row.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 11]).is_none());
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(5, 5, (1, 2, 3));
        assert!(fb.data.iter().all(|&b| b == 0));
        fb.set_pixel(1, 0, (1, 2, 3));
        assert_eq!(fb.pixel(1, 0), (1, 2, 3));
    }

    #[test]
    fn grid_lines_are_row_major() {
        let mut grid = AsciiGrid::new(2, 2);
        grid.set(0, 0, 'a');
        grid.set(1, 0, 'b');
        grid.set(0, 1, 'c');
        grid.set(1, 1, 'd');
        assert_eq!(grid.to_lines(), vec!["ab".to_string(), "cd".to_string()]);
    }
}
