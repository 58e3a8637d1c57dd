use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use texel_core::charset::{charset_from_str, charset_preset, parse_char_spec};
use texel_core::config::{OutputMode, RenderConfig};

/// texel — ASCII art par correspondance de luminosité.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Nombre de colonnes de caractères. Doit diviser la largeur paddée.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Charset initial, remplace celui de la config.
    #[arg(long)]
    pub charset: Option<String>,

    /// Charset prédéfini : digits, compact, standard.
    #[arg(long, conflicts_with = "charset")]
    pub preset: Option<String>,

    /// Ajouter au charset : "all", "space", un caractère ou une plage "a-z".
    #[arg(long, value_name = "SPEC")]
    pub add: Vec<String>,

    /// Retirer du charset, même syntaxe que --add.
    #[arg(long, value_name = "SPEC")]
    pub remove: Vec<String>,

    /// Inverser la luminance (fond clair).
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Sortie : console ou html.
    #[arg(long)]
    pub output: Option<String>,

    /// Fichier HTML écrit en sortie html.
    #[arg(long)]
    pub html_out: Option<PathBuf>,

    /// Police TrueType pour mesurer les glyphes. Défaut : police bitmap intégrée.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Lancer le shell interactif.
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(ref charset) = self.charset {
            config.charset.clone_from(charset);
        }
        if let Some(ref name) = self.preset {
            match charset_preset(name) {
                Some(preset) => config.charset = preset.to_string(),
                None => log::warn!("Preset inconnu '{name}' (digits, compact, standard)."),
            }
        }
        if self.invert {
            config.invert = true;
        }
        if let Some(ref mode) = self.output {
            config.output = match mode.as_str() {
                "console" => OutputMode::Console,
                "html" => OutputMode::Html,
                _ => {
                    log::warn!("Sortie inconnue '{mode}', utilisation du défaut.");
                    config.output
                }
            };
        }
        if let Some(ref path) = self.html_out {
            config.html_path.clone_from(path);
        }
        if let Some(ref font) = self.font {
            config.font_path = Some(font.clone());
        }
    }

    /// Charset de départ : celui de `config`, puis les `--add`, puis les `--remove`.
    ///
    /// # Errors
    /// Returns an error if an `--add` or `--remove` spec is malformed.
    pub fn initial_charset(&self, config: &RenderConfig) -> Result<BTreeSet<char>> {
        let mut charset = charset_from_str(&config.charset);
        for spec in &self.add {
            let chars = parse_char_spec(spec).with_context(|| format!("--add {spec}"))?;
            charset.extend(chars);
        }
        for spec in &self.remove {
            let chars = parse_char_spec(spec).with_context(|| format!("--remove {spec}"))?;
            for ch in chars {
                charset.remove(&ch);
            }
        }
        Ok(charset)
    }
}
