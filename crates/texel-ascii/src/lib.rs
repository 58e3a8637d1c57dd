/// ASCII conversion engine for texel.
///
/// Pads and tiles a frame, samples one brightness per tile and resolves each
/// brightness to the closest character of a mutable charset.
pub mod converter;
pub mod glyph;
pub mod matcher;
pub mod sampler;
pub mod tiler;

pub use converter::{ConvertRequest, Converter};
pub use glyph::{BuiltinGlyphs, GlyphBrightnessCache};
pub use matcher::CharMatcher;
