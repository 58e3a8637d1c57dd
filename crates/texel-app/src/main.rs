use std::io;

use anyhow::Result;
use clap::Parser;
use texel_ascii::converter::{ConvertRequest, Converter};
use texel_ascii::glyph::GlyphBrightnessCache;
use texel_core::config::{OutputMode, RenderConfig};
use texel_render::console::ConsoleOutput;
use texel_render::font::FontGlyphs;
use texel_render::html::HtmlOutput;
use texel_render::output::GridOutput;
use texel_source::image::ImageSource;

pub mod cli;
pub mod shell;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    config.clamp_all();
    config.validate()?;
    let charset = cli.initial_charset(&config)?;

    // 4. Charger l'image
    let source = ImageSource::open(&cli.image)?;

    // 5. Source des glyphes
    let glyphs = match config.font_path {
        Some(ref path) => GlyphBrightnessCache::new(Box::new(FontGlyphs::load(path)?)),
        None => GlyphBrightnessCache::default(),
    };
    let mut converter = Converter::new(glyphs);

    if cli.interactive {
        let mut shell = shell::Shell::new(source.frame(), &config, charset, converter);
        return shell.run(io::stdin().lock(), &mut io::stdout());
    }

    // 6. Conversion unique
    let request = ConvertRequest {
        image: source.frame(),
        charset,
        resolution: config.resolution,
        invert: config.invert,
    };
    let grid = converter.convert(&request)?;
    log::info!(
        "{} : {}x{} caractères",
        source.name(),
        grid.width,
        grid.height
    );

    match config.output {
        OutputMode::Console => ConsoleOutput::stdout().write_grid(&grid),
        OutputMode::Html => HtmlOutput::new(&config.html_path, &config.html_font).write_grid(&grid),
    }
}

fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        texel_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}

