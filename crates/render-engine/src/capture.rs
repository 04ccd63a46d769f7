//! Frame capture: cut the selected region out of a decoded frame.
//!
//! The crop is a straight pixel copy at the frame's native resolution.
//! No resampling happens here; scaling is the exporter's job.

use facesnap_region_model::raster::RasterImage;
use facesnap_region_model::region::{NormalizedRegion, PixelRect};

/// Pixel rectangle a region covers on `frame`.
pub fn capture_rect(frame: &RasterImage, region: &NormalizedRegion) -> PixelRect {
    region.to_pixel_rect(frame.width(), frame.height())
}

/// Copy the pixels under `region` into a new raster.
///
/// The output is exactly `round(width * W) x round(height * H)` (shrunk
/// by at most one pixel when rounding would overhang the frame edge) and
/// always at least 1x1.
pub fn capture(frame: &RasterImage, region: &NormalizedRegion) -> RasterImage {
    let rect = capture_rect(frame, region);

    if rect.x == 0 && rect.y == 0 && rect.width == frame.width() && rect.height == frame.height()
    {
        return frame.clone();
    }

    let cropped =
        image::imageops::crop_imm(frame.as_rgba(), rect.x, rect.y, rect.width, rect.height)
            .to_image();

    tracing::debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "Captured region"
    );

    RasterImage::from_rgba(cropped)
}

/// Capture the whole frame (the input handed to a region proposer).
pub fn capture_full(frame: &RasterImage) -> RasterImage {
    capture(frame, &NormalizedRegion::FULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
        }
        RasterImage::from_rgba(img)
    }

    #[test]
    fn test_full_capture_is_identical() {
        let frame = gradient(64, 48);
        let captured = capture_full(&frame);
        assert_eq!(captured.dimensions(), (64, 48));
        assert_eq!(captured, frame);
    }

    #[test]
    fn test_1080p_center_crop() {
        let frame = gradient(1920, 1080);
        let region = NormalizedRegion::new(0.25, 0.25, 0.5, 0.5);

        let rect = capture_rect(&frame, &region);
        assert_eq!((rect.x, rect.y), (480, 270));

        let captured = capture(&frame, &region);
        assert_eq!(captured.dimensions(), (960, 540));

        // Top-left output pixel is source pixel (480, 270).
        assert_eq!(
            captured.as_rgba().get_pixel(0, 0),
            frame.as_rgba().get_pixel(480, 270)
        );
        assert_eq!(
            captured.as_rgba().get_pixel(959, 539),
            frame.as_rgba().get_pixel(1439, 809)
        );
    }

    #[test]
    fn test_minimum_region_yields_at_least_one_pixel() {
        let frame = gradient(8, 8);
        let region = NormalizedRegion::new(0.99, 0.99, 0.0, 0.0);
        let captured = capture(&frame, &region);
        assert!(captured.width() >= 1);
        assert!(captured.height() >= 1);
    }

    #[test]
    fn test_odd_frame_rounding_stays_in_bounds() {
        let frame = gradient(3, 5);
        let region = NormalizedRegion::new(0.5, 0.5, 0.5, 0.5);
        let captured = capture(&frame, &region);
        assert_eq!(captured.width(), 1);
        assert!(captured.height() >= 1);
    }
}
