use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Police HTML par défaut.
pub const DEFAULT_HTML_FONT: &str = "Courier New";

/// Fichier HTML de sortie par défaut.
pub const DEFAULT_HTML_PATH: &str = "out.html";

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use texel_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.resolution, 2);
/// assert_eq!(config.charset, "0123456789");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Conversion ===
    /// Charset initial (ordre sans importance, doublons ignorés).
    pub charset: String,
    /// Nombre de colonnes de sous-images. Doit diviser la largeur paddée.
    pub resolution: u32,
    /// Inverser la luminance (pour fond clair).
    pub invert: bool,
    /// Police TrueType pour la couverture des glyphes. `None` = police bitmap intégrée.
    pub font_path: Option<PathBuf>,

    // === Sortie ===
    /// Destination de la grille.
    pub output: OutputMode,
    /// Fichier écrit en mode HTML.
    pub html_path: PathBuf,
    /// Famille de police CSS du fichier HTML.
    pub html_font: String,
}

/// Output destination.
///
/// # Example
/// ```
/// use texel_core::config::OutputMode;
/// assert!(matches!(OutputMode::default(), OutputMode::Console));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Standard output, one line per row.
    #[default]
    Console,
    /// Standalone HTML file.
    Html,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: crate::charset::CHARSET_DIGITS.to_string(),
            resolution: 2,
            invert: false,
            font_path: None,
            output: OutputMode::Console,
            html_path: PathBuf::from(DEFAULT_HTML_PATH),
            html_font: DEFAULT_HTML_FONT.to_string(),
        }
    }
}

impl RenderConfig {
    /// Clamp numeric fields and restore empty strings to their defaults.
    /// Called after TOML deserialization.
    pub fn clamp_all(&mut self) {
        if self.resolution == 0 {
            log::warn!("Résolution 0 invalide, ramenée à 1");
            self.resolution = 1;
        }
        if self.html_font.trim().is_empty() {
            log::warn!("Police HTML vide, utilisation de {DEFAULT_HTML_FONT}");
            self.html_font = DEFAULT_HTML_FONT.to_string();
        }
    }

    /// Reject values that clamping cannot repair.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] when the charset is empty.
    ///
    /// # Example
    /// ```
    /// use texel_core::config::RenderConfig;
    /// let mut config = RenderConfig::default();
    /// assert!(config.validate().is_ok());
    /// config.charset.clear();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.charset.is_empty() {
            return Err(CoreError::Config("charset vide".into()));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    output: Option<OutputSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    charset: Option<String>,
    resolution: Option<u32>,
    invert: Option<bool>,
    font: Option<PathBuf>,
}

/// Output section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct OutputSection {
    mode: Option<OutputMode>,
    html_path: Option<PathBuf>,
    html_font: Option<String>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the document is not valid TOML or fails validation.
///
/// # Example
/// ```
/// use texel_core::config::{parse_config, OutputMode};
/// let config = parse_config("[render]\nresolution = 64\n[output]\nmode = \"html\"\n").unwrap();
/// assert_eq!(config.resolution, 64);
/// assert_eq!(config.output, OutputMode::Html);
/// assert_eq!(config.charset, "0123456789");
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.resolution {
            config.resolution = v;
        }
        if let Some(v) = r.invert {
            config.invert = v;
        }
        if let Some(v) = r.font {
            config.font_path = Some(v);
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.mode {
            config.output = v;
        }
        if let Some(v) = o.html_path {
            config.html_path = v;
        }
        if let Some(v) = o.html_font {
            config.html_font = v;
        }
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use texel_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn zero_resolution_is_clamped() {
        let config = parse_config("[render]\nresolution = 0\n").unwrap();
        assert_eq!(config.resolution, 1);
    }

    #[test]
    fn clamp_repairs_only_broken_fields() {
        let mut config = RenderConfig {
            resolution: 0,
            html_font: "  ".into(),
            ..RenderConfig::default()
        };
        config.clamp_all();
        assert_eq!(config.resolution, 1);
        assert_eq!(config.html_font, DEFAULT_HTML_FONT);

        let mut untouched = RenderConfig {
            resolution: 64,
            html_font: "Fira Mono".into(),
            ..RenderConfig::default()
        };
        let before = untouched.clone();
        untouched.clamp_all();
        assert_eq!(untouched, before);
    }

    #[test]
    fn empty_charset_is_rejected() {
        assert!(parse_config("[render]\ncharset = \"\"\n").is_err());
    }

    #[test]
    fn unknown_output_mode_is_rejected() {
        assert!(parse_config("[output]\nmode = \"pdf\"\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[render]\ncharset = \" @\"\ninvert = true\nfont = \"fonts/mono.ttf\"\n\n[output]\nhtml_font = \"\"\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.charset, " @");
        assert!(config.invert);
        assert_eq!(config.font_path, Some(PathBuf::from("fonts/mono.ttf")));
        assert_eq!(config.html_font, DEFAULT_HTML_FONT);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }
}
