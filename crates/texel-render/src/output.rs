use texel_core::frame::AsciiGrid;

/// Destination d'une grille convertie.
///
/// # Example
/// ```
/// use texel_core::frame::AsciiGrid;
/// use texel_render::output::GridOutput;
///
/// struct Count(usize);
/// impl GridOutput for Count {
///     fn write_grid(&mut self, grid: &AsciiGrid) -> anyhow::Result<()> {
///         self.0 += grid.cells.len();
///         Ok(())
///     }
/// }
/// let mut out = Count(0);
/// out.write_grid(&AsciiGrid::new(3, 2)).unwrap();
/// assert_eq!(out.0, 6);
/// ```
pub trait GridOutput {
    /// Écrit la grille complète.
    ///
    /// # Errors
    /// Returns an error if the underlying writer or file fails.
    fn write_grid(&mut self, grid: &AsciiGrid) -> anyhow::Result<()>;
}
