//! Decoded pixel buffers.

use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use image::{DynamicImage, RgbaImage};

/// A decoded, uncompressed RGBA8 bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Wrap an existing RGBA buffer.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Build from raw row-major RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, rgba: Vec<u8>) -> FaceSnapResult<Self> {
        if width == 0 || height == 0 {
            return Err(FaceSnapError::decode("raster dimensions are zero"));
        }
        let expected = width as usize * height as usize * 4;
        let actual = rgba.len();
        RgbaImage::from_raw(width, height, rgba)
            .map(Self::from_rgba)
            .ok_or_else(|| {
                FaceSnapError::decode(format!(
                    "expected {expected} bytes for a {width}x{height} RGBA raster, got {actual}"
                ))
            })
    }

    /// Decode an encoded image (PNG or JPEG).
    pub fn decode(bytes: &[u8]) -> FaceSnapResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| FaceSnapError::decode(e.to_string()))?;
        Self::from_dynamic(decoded)
    }

    /// Convert any decoded image into RGBA8.
    pub fn from_dynamic(image: DynamicImage) -> FaceSnapResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FaceSnapError::decode("image dimensions are zero"));
        }
        Ok(Self::from_rgba(image.into_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.pixels().any(|p| p.0[3] < u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(RasterImage::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(RasterImage::from_raw(2, 2, vec![0; 15]).is_err());
        assert!(RasterImage::from_raw(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = RasterImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, FaceSnapError::Decode { .. }));
    }

    #[test]
    fn test_transparency_detection() {
        let mut pixels = RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        assert!(!RasterImage::from_rgba(pixels.clone()).has_transparency());
        pixels.put_pixel(1, 0, image::Rgba([10, 20, 30, 0]));
        assert!(RasterImage::from_rgba(pixels).has_transparency());
    }
}
