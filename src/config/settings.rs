use std::path::{Path, PathBuf};

use crate::foundation::core::Viewport;
use crate::foundation::error::{CardError, CardResult};

/// Environment variable that overrides [`StudioSettings::fonts_dir`].
pub const FONTS_DIR_ENV: &str = "PACCARD_FONTS_DIR";
/// Environment variable that overrides [`StudioSettings::downloads_dir`].
pub const DOWNLOADS_DIR_ENV: &str = "PACCARD_DOWNLOADS_DIR";

/// Output size and frame rate of the capture surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Capture width in pixels.
    pub width: u32,
    /// Capture height in pixels.
    pub height: u32,
    /// Capture frames per second.
    pub fps: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 60,
        }
    }
}

impl CaptureSettings {
    pub fn validate(&self) -> CardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CardError::validation(
                "capture width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(CardError::validation("capture fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // VP8/VP9 in yuv420p needs even dimensions.
            return Err(CardError::validation(
                "capture width/height must be even (required for yuv420p webm output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(CardError::validation("capture width/height exceed 65535"));
        }
        Ok(())
    }
}

/// Process-level settings for the studio (not part of any card).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioSettings {
    /// Viewport the stage is laid out in.
    pub viewport: Viewport,
    /// Capture surface parameters used during export.
    pub capture: CaptureSettings,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Directory exported clips are written to.
    pub downloads_dir: PathBuf,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            capture: CaptureSettings::default(),
            fonts_dir: None,
            downloads_dir: PathBuf::from("."),
        }
    }
}

impl StudioSettings {
    /// Load settings from a JSON file, then apply environment overrides.
    pub fn load(path: &Path) -> CardResult<Self> {
        use anyhow::Context as _;
        let f = std::fs::File::open(path)
            .with_context(|| format!("open settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_reader(std::io::BufReader::new(f))?;
        let settings = settings.with_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `PACCARD_FONTS_DIR` / `PACCARD_DOWNLOADS_DIR` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env_path(FONTS_DIR_ENV) {
            self.fonts_dir = Some(dir);
        }
        if let Some(dir) = env_path(DOWNLOADS_DIR_ENV) {
            self.downloads_dir = dir;
        }
        self
    }

    pub fn validate(&self) -> CardResult<()> {
        self.viewport.validate()?;
        self.capture.validate()?;
        if self.downloads_dir.as_os_str().is_empty() {
            return Err(CardError::validation("downloads_dir must be non-empty"));
        }
        Ok(())
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
