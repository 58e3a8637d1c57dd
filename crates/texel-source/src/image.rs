use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use texel_core::error::CoreError;
use texel_core::frame::FrameBuffer;

/// Image statique chargée depuis le disque.
///
/// Garde le chemin d'origine pour l'affichage et partage la frame via `Arc`,
/// dont l'identité sert de clé au cache de luminosité.
///
/// # Example
/// ```no_run
/// use texel_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::open(Path::new("test.png")).unwrap();
/// println!("{}x{}", source.frame().width, source.frame().height);
/// ```
pub struct ImageSource {
    name: String,
    frame: Arc<FrameBuffer>,
}

impl ImageSource {
    /// Load an image from disk.
    ///
    /// # Errors
    /// Returns an error if the file is missing or cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        let frame = load_image(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| path.display().to_string(), String::from);
        log::info!("Image chargée : {name} ({}x{})", frame.width, frame.height);
        Ok(Self {
            name,
            frame: Arc::new(frame),
        })
    }

    /// Nom de fichier de l'image.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle on the decoded frame.
    #[must_use]
    pub fn frame(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.frame)
    }
}

/// Décode une image (PNG, JPEG, BMP, GIF) en `FrameBuffer` RGB.
///
/// L'alpha est ignoré.
///
/// # Errors
/// Returns an error if the file is missing or cannot be decoded.
///
/// # Example
/// ```no_run
/// use texel_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("test.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    FrameBuffer::from_raw(width, height, rgb.into_raw())
        .with_context(|| format!("Buffer RGB incohérent pour {}", path.display()))
}
