//! Export HTML autonome : la grille dans un `<pre>` à police monospace.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use texel_core::config::{DEFAULT_HTML_FONT, DEFAULT_HTML_PATH};
use texel_core::frame::AsciiGrid;

use crate::output::GridOutput;

const FONT_SIZE_PX: u32 = 4;
const LINE_HEIGHT: f32 = 0.6;

/// Fichier HTML de sortie.
///
/// Le fichier est réécrit à chaque grille.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlOutput {
    path: PathBuf,
    font: String,
}

impl HtmlOutput {
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            font: font.into(),
        }
    }

    /// Fichier cible.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new(DEFAULT_HTML_PATH, DEFAULT_HTML_FONT)
    }
}

impl GridOutput for HtmlOutput {
    fn write_grid(&mut self, grid: &AsciiGrid) -> Result<()> {
        let page = render_html(grid, &self.font);
        std::fs::write(&self.path, page)
            .with_context(|| format!("Impossible d'écrire {}", self.path.display()))?;
        log::info!("HTML écrit : {}", self.path.display());
        Ok(())
    }
}

/// Échappe `&`, `<`, `>` et `"`.
///
/// # Example
/// ```
/// use texel_render::html::escape_html;
/// assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

#[inline]
fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}

/// Build the full HTML document for `grid`.
#[must_use]
pub fn render_html(grid: &AsciiGrid, font: &str) -> String {
    let mut page = String::with_capacity(grid.cells.len() * 2 + 256);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>ASCII Art</title>\n</head>\n<body>\n");
    let _ = writeln!(
        page,
        "<pre style=\"font-family: &quot;{}&quot;, monospace; font-size: {FONT_SIZE_PX}px; line-height: {LINE_HEIGHT};\">",
        escape_html(font)
    );
    for row in grid.rows() {
        for &ch in row {
            push_escaped(&mut page, ch);
        }
        page.push('\n');
    }
    page.push_str("</pre>\n</body>\n</html>\n");
    page
}
