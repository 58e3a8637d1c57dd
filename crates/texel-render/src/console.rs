use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use texel_core::frame::AsciiGrid;

use crate::output::GridOutput;

/// Écrit la grille ligne par ligne, sans séparateur entre caractères.
///
/// # Example
/// ```
/// use texel_core::frame::AsciiGrid;
/// use texel_render::console::ConsoleOutput;
/// use texel_render::output::GridOutput;
///
/// let mut grid = AsciiGrid::new(2, 1);
/// grid.set(1, 0, '#');
/// let mut out = ConsoleOutput::new(Vec::new());
/// out.write_grid(&grid).unwrap();
/// assert_eq!(out.into_inner(), b" #\n");
/// ```
#[derive(Debug)]
pub struct ConsoleOutput<W: Write> {
    writer: W,
}

impl ConsoleOutput<Stdout> {
    /// Sortie standard.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Rend le writer sous-jacent.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GridOutput for ConsoleOutput<W> {
    fn write_grid(&mut self, grid: &AsciiGrid) -> Result<()> {
        let mut line = String::with_capacity(grid.width as usize * 4 + 1);
        for row in grid.rows() {
            line.clear();
            line.extend(row.iter());
            line.push('\n');
            self.writer
                .write_all(line.as_bytes())
                .context("Écriture console impossible")?;
        }
        self.writer.flush().context("Flush console impossible")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_row() {
        let mut grid = AsciiGrid::new(3, 2);
        grid.set(0, 0, 'a');
        grid.set(2, 1, 'é');
        let mut out = ConsoleOutput::new(Vec::new());
        out.write_grid(&grid).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "a  \n  é\n");
    }

    #[test]
    fn empty_grid_writes_nothing() {
        let mut out = ConsoleOutput::new(Vec::new());
        out.write_grid(&AsciiGrid::new(0, 0)).unwrap();
        assert!(out.into_inner().is_empty());
    }
}
