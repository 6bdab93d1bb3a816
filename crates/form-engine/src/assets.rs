//! Logos loaded once from the asset directory
//!
//! Every logo is optional. A missing file leaves a blank space on the page
//! and a file that cannot be decoded is skipped with a warning.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pdf_layout::RasterImage;
use tracing::{debug, warn};

/// A decoded logo plus the original bytes for HTML previews
#[derive(Debug, Clone)]
pub struct Logo {
    pub image: RasterImage,
    bytes: Vec<u8>,
    mime: &'static str,
}

impl Logo {
    pub fn from_bytes(bytes: Vec<u8>, mime: &'static str) -> Result<Self, pdf_layout::LayoutError> {
        let image = RasterImage::decode(&bytes)?;
        Ok(Self { image, bytes, mime })
    }

    /// `data:` URI for an `<img>` tag
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// The logos used by the document layouts
#[derive(Debug, Clone, Default)]
pub struct Assets {
    /// State coat of arms used by the inmate header
    pub state_header: Option<Logo>,
    pub footer_left: Option<Logo>,
    pub footer_right: Option<Logo>,
    pub sugesp: Option<Logo>,
    /// Agency logo on the vehicle log, restitution and declaration
    pub agency: Option<Logo>,
}

impl Assets {
    /// Load every logo found under `dir`
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let assets = Self {
            state_header: load_logo(dir, &["logo_ro_horizontal.jpg", "logo_ro_horizontal.JPG"]),
            footer_left: load_logo(dir, &["logo_inferior_esq.JPG", "logo_inferior_esq.jpg"]),
            footer_right: load_logo(dir, &["logo_inferior_dir.JPG", "logo_inferior_dir.jpg"]),
            sugesp: load_logo(dir, &["logo_sugesp.png", "logo_sugesp.PNG"]),
            agency: load_logo(dir, &["logo_inferior_dir.jpg", "logo_inferior_dir.JPG"]),
        };
        debug!(
            dir = %dir.display(),
            loaded = assets.loaded_count(),
            "Loaded form assets"
        );
        assets
    }

    /// No logos at all; layouts still render
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn loaded_count(&self) -> usize {
        [
            &self.state_header,
            &self.footer_left,
            &self.footer_right,
            &self.sugesp,
            &self.agency,
        ]
        .iter()
        .filter(|logo| logo.is_some())
        .count()
    }
}

fn load_logo(dir: &Path, candidates: &[&str]) -> Option<Logo> {
    for name in candidates {
        let path = dir.join(name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        return match Logo::from_bytes(bytes, mime_for(name)) {
            Ok(logo) => Some(logo),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable logo");
                None
            }
        };
    }
    debug!(dir = %dir.display(), file = candidates.first().copied().unwrap_or(""), "Logo not found");
    None
}

fn mime_for(name: &str) -> &'static str {
    if name.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}
