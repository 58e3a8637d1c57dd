/// Visual source modules for texel.

pub mod image;
