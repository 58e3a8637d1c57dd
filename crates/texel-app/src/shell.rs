//! Shell interactif : édition du charset, résolution, sortie, conversion.
//!
//! Commandes :
//!
//! ```text
//! chars                 affiche le charset trié
//! add <spec>            all | space | c | a-z
//! remove <spec>         idem
//! res [up|down]         affiche, double ou divise par deux la résolution
//! reverse               bascule l'inversion de luminance
//! output console|html   choisit la sortie
//! asciiArt              convertit et écrit
//! exit                  quitte
//! ```

use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use texel_ascii::converter::{ConvertRequest, Converter};
use texel_ascii::tiler::next_power_of_two;
use texel_core::charset::parse_char_spec;
use texel_core::config::{OutputMode, RenderConfig};
use texel_core::frame::FrameBuffer;
use texel_render::console::ConsoleOutput;
use texel_render::html::HtmlOutput;
use texel_render::output::GridOutput;
use thiserror::Error;

const PROMPT: &str = ">>> ";
const MIN_CHARSET_SIZE: usize = 2;
const RESOLUTION_FACTOR: u32 = 2;

/// Mauvaise utilisation d'une commande : affichée, le shell continue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error("Did not execute due to incorrect command.")]
    IncorrectCommand,

    #[error("Did not add due to incorrect format.")]
    AddFormat,

    #[error("Did not remove due to incorrect format.")]
    RemoveFormat,

    #[error("Did not change resolution due to exceeding boundaries.")]
    ResolutionBounds,

    #[error("Did not change resolution due to incorrect format.")]
    ResolutionFormat,

    #[error("Did not change output method due to incorrect format.")]
    OutputFormat,

    #[error("Did not execute. Charset is too small.")]
    CharsetTooSmall,
}

/// Suite de la boucle après une commande.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// État du shell. Un seul `Converter` sert toutes les commandes `asciiArt`.
#[derive(Debug)]
pub struct Shell {
    image: Arc<FrameBuffer>,
    charset: BTreeSet<char>,
    resolution: u32,
    min_resolution: u32,
    max_resolution: u32,
    invert: bool,
    output: OutputMode,
    html_path: PathBuf,
    html_font: String,
    converter: Converter,
}

impl Shell {
    /// Build a shell over `image`.
    ///
    /// Resolution bounds are `max(1, width / height)..=width`. The configured
    /// resolution is clamped into them, then rounded up to a power of two when
    /// it does not divide the padded width.
    pub fn new(
        image: Arc<FrameBuffer>,
        config: &RenderConfig,
        charset: BTreeSet<char>,
        converter: Converter,
    ) -> Self {
        let max_resolution = image.width.max(1);
        let min_resolution = (image.width / image.height.max(1)).clamp(1, max_resolution);
        let resolution = starting_resolution(
            config.resolution,
            min_resolution,
            max_resolution,
            next_power_of_two(image.width),
        );
        if resolution != config.resolution {
            log::warn!(
                "Résolution {} inutilisable (bornes [{min_resolution}, {max_resolution}]), ramenée à {resolution}",
                config.resolution
            );
        }
        Self {
            image,
            charset,
            resolution,
            min_resolution,
            max_resolution,
            invert: config.invert,
            output: config.output,
            html_path: config.html_path.clone(),
            html_font: config.html_font.clone(),
            converter,
        }
    }

    /// Résolution courante.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Charset courant.
    #[must_use]
    pub fn charset(&self) -> &BTreeSet<char> {
        &self.charset
    }

    /// Lit et exécute des commandes jusqu'à `exit`, la fin de l'entrée ou
    /// une erreur autre qu'une [`UsageError`].
    ///
    /// # Errors
    /// Returns an error only if reading `input` or writing `out` fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next().transpose().context("Lecture stdin impossible")? else {
                writeln!(out)?;
                return Ok(());
            };

            match self.execute(&line, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => {
                    if let Some(usage) = e.downcast_ref::<UsageError>() {
                        writeln!(out, "{usage}")?;
                    } else {
                        log::error!("Commande '{line}' : {e:#}");
                        writeln!(out, "An unexpected error occurred: {e:#}")?;
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Exécute une ligne de commande.
    ///
    /// # Errors
    /// [`UsageError`] for a misused command; any other error is fatal to the
    /// shell.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let mut args = line.split_whitespace();
        let Some(command) = args.next() else {
            return Ok(Flow::Continue);
        };
        let arg = args.next();

        match command {
            "exit" => return Ok(Flow::Exit),
            "chars" => self.print_charset(out)?,
            "add" => self.edit_charset(arg, true)?,
            "remove" => self.edit_charset(arg, false)?,
            "res" => self.change_resolution(arg, out)?,
            "reverse" => self.invert = !self.invert,
            "output" => self.change_output(arg)?,
            "asciiArt" => self.render(out)?,
            _ => return Err(UsageError::IncorrectCommand.into()),
        }
        Ok(Flow::Continue)
    }

    fn print_charset<W: Write>(&self, out: &mut W) -> Result<()> {
        for ch in &self.charset {
            write!(out, "{ch} ")?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn edit_charset(&mut self, spec: Option<&str>, add: bool) -> Result<(), UsageError> {
        let format_error = if add {
            UsageError::AddFormat
        } else {
            UsageError::RemoveFormat
        };
        let chars = spec
            .and_then(|s| parse_char_spec(s).ok())
            .ok_or(format_error)?;

        for ch in chars {
            if add {
                self.charset.insert(ch);
            } else {
                self.charset.remove(&ch);
            }
        }
        log::debug!("charset : {} caractères", self.charset.len());
        Ok(())
    }

    fn change_resolution<W: Write>(&mut self, direction: Option<&str>, out: &mut W) -> Result<()> {
        match direction {
            None => {}
            Some("up") => {
                let next = self.resolution.saturating_mul(RESOLUTION_FACTOR);
                if next > self.max_resolution {
                    return Err(UsageError::ResolutionBounds.into());
                }
                self.resolution = next;
            }
            Some("down") => {
                let next = self.resolution / RESOLUTION_FACTOR;
                if next < self.min_resolution {
                    return Err(UsageError::ResolutionBounds.into());
                }
                self.resolution = next;
            }
            Some(_) => return Err(UsageError::ResolutionFormat.into()),
        }
        writeln!(out, "Resolution set to {}.", self.resolution)?;
        Ok(())
    }

    fn change_output(&mut self, mode: Option<&str>) -> Result<(), UsageError> {
        self.output = match mode {
            Some("console") => OutputMode::Console,
            Some("html") => OutputMode::Html,
            _ => return Err(UsageError::OutputFormat),
        };
        Ok(())
    }

    fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.charset.len() < MIN_CHARSET_SIZE {
            return Err(UsageError::CharsetTooSmall.into());
        }

        let request = ConvertRequest {
            image: Arc::clone(&self.image),
            charset: self.charset.clone(),
            resolution: self.resolution,
            invert: self.invert,
        };
        let grid = self.converter.convert(&request)?;
        log::debug!("cache : {:?}", self.converter.stats());

        match self.output {
            OutputMode::Console => ConsoleOutput::new(out).write_grid(&grid),
            OutputMode::Html => {
                HtmlOutput::new(&self.html_path, &self.html_font).write_grid(&grid)
            }
        }
    }
}

/// Résolution de départ : bornée, et divisant la largeur paddée si possible.
///
/// Sans candidat valide, la valeur configurée est gardée telle quelle.
fn starting_resolution(configured: u32, min: u32, max: u32, padded_width: u32) -> u32 {
    let clamped = configured.clamp(min, max);
    if padded_width % clamped == 0 {
        return clamped;
    }
    let rounded = next_power_of_two(clamped);
    if rounded <= max && padded_width % rounded == 0 {
        return rounded;
    }
    log::warn!(
        "Aucune résolution dans [{min}, {max}] ne divise la largeur {padded_width}, {configured} conservée"
    );
    configured
}
