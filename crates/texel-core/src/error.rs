use thiserror::Error;

/// Errors originating from the core conversion pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Resolution is zero or does not evenly partition the padded width.
    #[error("Résolution invalide : {resolution} ne divise pas la largeur {padded_width}")]
    InvalidResolution {
        /// Requested number of columns.
        resolution: u32,
        /// Width of the padded canvas.
        padded_width: u32,
    },

    /// A query was issued against a matcher with no characters.
    #[error("Aucun caractère disponible pour la correspondance")]
    EmptyMatcher,

    /// A matcher was built from an empty character set.
    #[error("Charset vide : au moins un caractère est requis")]
    InvalidCharset,

    /// A brightness query was not a number.
    #[error("Luminosité invalide : {0}")]
    InvalidBrightness(f64),

    /// Add/remove argument is not `all`, `space`, a printable char or a range.
    #[error("Spécification de caractères invalide : {0}")]
    InvalidCharSpec(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },
}
