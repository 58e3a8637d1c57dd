/// Configuration, types, and shared structures for texel.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the texel workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use config::RenderConfig;
pub use error::CoreError;
pub use frame::{AsciiGrid, FrameBuffer, GLYPH_SIZE, GlyphBitmap, Rgb};
pub use traits::{GlyphSource, PixelSource};
