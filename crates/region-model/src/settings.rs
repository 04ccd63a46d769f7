//! Export settings chosen on the preview screen.

use std::fmt;
use std::str::FromStr;

use facesnap_common::config::ExportDefaults;
use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use serde::{Deserialize, Serialize};

/// Output image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, alpha preserved.
    #[default]
    Png,
    /// Lossy, opaque (transparency flattened onto white).
    Jpeg,
}

impl ExportFormat {
    /// File extension used for exported files.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// IANA media type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("png"),
            ExportFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = FaceSnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            other => Err(FaceSnapError::invalid_input(format!(
                "Unknown format: {other}. Use: png, jpeg"
            ))),
        }
    }
}

/// How a captured region is encoded for download.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output format.
    pub format: ExportFormat,

    /// Output size relative to the captured region (1.0 = native).
    pub scale: f64,

    /// Lossy encoder quality in (0, 1]. Ignored for PNG.
    pub quality: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: 1.0,
            quality: 0.92,
        }
    }
}

impl ExportSettings {
    pub fn png(scale: f64) -> Self {
        Self {
            format: ExportFormat::Png,
            scale,
            ..Self::default()
        }
    }

    pub fn jpeg(scale: f64, quality: f64) -> Self {
        Self {
            format: ExportFormat::Jpeg,
            scale,
            quality,
        }
    }

    /// Settings seeded from the configured defaults.
    pub fn from_defaults(defaults: &ExportDefaults) -> FaceSnapResult<Self> {
        let settings = Self {
            format: defaults.format.parse()?,
            scale: defaults.scale,
            quality: defaults.quality,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check that scale is positive and quality lies in (0, 1].
    pub fn validate(&self) -> FaceSnapResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FaceSnapError::invalid_input(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !self.quality.is_finite() || self.quality <= 0.0 || self.quality > 1.0 {
            return Err(FaceSnapError::invalid_input(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Quality as an encoder percentage (1..=100).
    pub fn quality_percent(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Output pixel size for a source of `width` x `height`.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scaled = |v: u32| ((v as f64 * self.scale).round() as u32).max(1);
        (scaled(width), scaled(height))
    }
}
