pub mod console;
/// Output sinks and glyph sources for texel.
///
/// Writes character grids to a terminal or an HTML file, and rasterizes
/// TrueType glyphs for brightness measurement.
pub mod font;
pub mod html;
pub mod output;

pub use console::ConsoleOutput;
pub use font::FontGlyphs;
pub use html::HtmlOutput;
pub use output::GridOutput;
