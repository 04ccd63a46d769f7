//! Export rendering: scale, encode, and name a captured region.

use std::path::{Path, PathBuf};

use base64::Engine;
use facesnap_common::clock::ExportClock;
use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use facesnap_region_model::raster::RasterImage;
use facesnap_region_model::settings::{ExportFormat, ExportSettings};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};

/// Filename prefix used when none is configured.
pub const DEFAULT_FILENAME_PREFIX: &str = "extracted_face";

/// Largest output accepted by [`ExportRenderer::render`] (64 megapixels).
pub const MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// An encoded export, ready to be written or copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Encoded file contents.
    pub bytes: Vec<u8>,

    /// Suggested filename (no directory).
    pub filename: String,

    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Encoding of `bytes`.
    pub format: ExportFormat,
}

impl RenderedImage {
    /// Write the image into `dir` under its suggested filename.
    pub fn save(&self, dir: &Path) -> FaceSnapResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            "Saved export"
        );
        Ok(path)
    }

    /// `data:` URI of the encoded bytes.
    pub fn data_uri(&self) -> String {
        data_uri(&self.bytes, self.format)
    }

    /// Decode the bytes back into a raster.
    pub fn decode(&self) -> FaceSnapResult<RasterImage> {
        RasterImage::decode(&self.bytes)
    }
}

/// Turns captured rasters into downloadable image files.
#[derive(Debug, Clone)]
pub struct ExportRenderer {
    prefix: String,
    clock: &'static ExportClock,
}

impl ExportRenderer {
    /// Renderer using the default filename prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_FILENAME_PREFIX)
    }

    /// Renderer naming its files `<prefix>_...`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = if prefix.trim().is_empty() {
            DEFAULT_FILENAME_PREFIX.to_string()
        } else {
            prefix
        };
        Self {
            prefix,
            clock: ExportClock::process(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Scale and encode `source` according to `settings`.
    pub fn render(
        &self,
        source: &RasterImage,
        settings: &ExportSettings,
    ) -> FaceSnapResult<RenderedImage> {
        settings.validate()?;

        let (width, height) = settings.target_dimensions(source.width(), source.height());
        let pixels = u64::from(width) * u64::from(height);
        if pixels > MAX_OUTPUT_PIXELS {
            return Err(FaceSnapError::render(format!(
                "Output of {width}x{height} at scale {} exceeds the {MAX_OUTPUT_PIXELS} pixel limit",
                settings.scale
            )));
        }
        let scaled = resample(source.as_rgba(), width, height);

        let bytes = match settings.format {
            ExportFormat::Png => encode_png_rgba(&scaled)?,
            ExportFormat::Jpeg => encode_jpeg_rgba(&scaled, settings.quality_percent())?,
        };

        let filename = self.filename(settings, self.clock.next_stamp());

        tracing::info!(
            format = %settings.format,
            width,
            height,
            bytes = bytes.len(),
            filename = %filename,
            "Rendered export"
        );

        Ok(RenderedImage {
            bytes,
            filename,
            width,
            height,
            format: settings.format,
        })
    }

    /// `<prefix>_<scale>x_<ts>.png` or `<prefix>_<scale>x_q<pct>_<ts>.jpg`.
    pub fn filename(&self, settings: &ExportSettings, timestamp_ms: i64) -> String {
        match settings.format {
            ExportFormat::Png => format!(
                "{}_{}x_{}.{}",
                self.prefix,
                settings.scale,
                timestamp_ms,
                settings.format.extension()
            ),
            ExportFormat::Jpeg => format!(
                "{}_{}x_q{}_{}.{}",
                self.prefix,
                settings.scale,
                settings.quality_percent(),
                timestamp_ms,
                settings.format.extension()
            ),
        }
    }
}

impl Default for ExportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lossless PNG encoding of a raster (the preview representation).
pub fn encode_png(raster: &RasterImage) -> FaceSnapResult<Vec<u8>> {
    encode_png_rgba(raster.as_rgba())
}

/// JPEG encoding of a raster, flattened onto white.
///
/// `quality` is in (0, 1]; it is mapped to an encoder percentage.
pub fn encode_jpeg(raster: &RasterImage, quality: f64) -> FaceSnapResult<Vec<u8>> {
    let percent = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    encode_jpeg_rgba(raster.as_rgba(), percent)
}

/// `data:<mime>;base64,<payload>` for encoded image bytes.
pub fn data_uri(bytes: &[u8], format: ExportFormat) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", format.mime_type(), payload)
}

/// Composite RGBA over opaque white.
pub fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

fn resample(rgba: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if rgba.width() == width && rgba.height() == height {
        return rgba.clone();
    }
    image::imageops::resize(rgba, width, height, FilterType::Lanczos3)
}

fn encode_png_rgba(rgba: &RgbaImage) -> FaceSnapResult<Vec<u8>> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| FaceSnapError::render(format!("PNG encoding failed: {e}")))?;
    Ok(buffer)
}

fn encode_jpeg_rgba(rgba: &RgbaImage, quality_percent: u8) -> FaceSnapResult<Vec<u8>> {
    let rgb = flatten_onto_white(rgba);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality_percent)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| FaceSnapError::render(format!("JPEG encoding failed: {e}")))?;
    Ok(buffer)
}
