//! Normalized selection regions and their pixel projections.
//!
//! All region coordinates are normalized to `[0.0, 1.0]` relative to the
//! frame, so a selection survives changes of display size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest width or height a region may shrink to (5% of the frame).
pub const MIN_REGION_SIZE: f64 = 0.05;

/// A rectangular selection within a video frame.
///
/// `(0.0, 0.0)` is the top-left and `(1.0, 1.0)` the bottom-right of the
/// frame. Values built through [`NormalizedRegion::new`] or
/// [`NormalizedRegion::clamped`] always satisfy `x + width <= 1`,
/// `y + height <= 1` and `width, height >= MIN_REGION_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub width: f64,
    /// Height (normalized).
    pub height: f64,
}

impl NormalizedRegion {
    /// The whole frame.
    pub const FULL: NormalizedRegion = NormalizedRegion {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Selection placed when the editor opens.
    pub const INITIAL: NormalizedRegion = NormalizedRegion {
        x: 0.35,
        y: 0.25,
        width: 0.3,
        height: 0.3,
    };

    /// Create a region, clamping values into the valid range.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .clamped()
    }

    /// Build a region from its edges, or `None` when the edges are not
    /// finite or describe an empty/inverted box.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return None;
        }
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// Copy of this region with every invariant enforced.
    ///
    /// Size is fixed first (floored at [`MIN_REGION_SIZE`], capped at 1),
    /// then the origin is pulled back so the region stays inside the frame.
    /// Non-finite components fall back to the corresponding [`Self::FULL`] value.
    pub fn clamped(&self) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        let width = finite_or(self.width, 1.0).clamp(MIN_REGION_SIZE, 1.0);
        let height = finite_or(self.height, 1.0).clamp(MIN_REGION_SIZE, 1.0);
        let x = finite_or(self.x, 0.0).clamp(0.0, 1.0 - width);
        let y = finite_or(self.y, 0.0).clamp(0.0, 1.0 - height);

        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether all invariants hold (within a small float tolerance).
    pub fn is_valid(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.width >= MIN_REGION_SIZE - EPS
            && self.height >= MIN_REGION_SIZE - EPS
            && self.right() <= 1.0 + EPS
            && self.bottom() <= 1.0 + EPS
    }

    /// Shift the region by a normalized delta, keeping its size and
    /// stopping at the frame edges.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let base = self.clamped();
        Self {
            x: (base.x + dx).min(1.0 - base.width).max(0.0),
            y: (base.y + dy).min(1.0 - base.height).max(0.0),
            ..base
        }
    }

    /// Grow or shrink the region from its bottom-right corner, keeping the
    /// origin fixed. Size never drops below [`MIN_REGION_SIZE`].
    pub fn resized(&self, dw: f64, dh: f64) -> Self {
        // min-then-max: `1 - x` can land an ulp under the floor.
        let base = self.clamped();
        Self {
            width: (base.width + dw).min(1.0 - base.x).max(MIN_REGION_SIZE),
            height: (base.height + dh).min(1.0 - base.y).max(MIN_REGION_SIZE),
            ..base
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Project onto a frame of `frame_width` x `frame_height` pixels.
    ///
    /// Each component is rounded independently; the result is then pulled
    /// inside the frame and is never smaller than 1x1.
    pub fn to_pixel_rect(&self, frame_width: u32, frame_height: u32) -> PixelRect {
        let project = |origin: f64, extent: f64, size: u32| -> (u32, u32) {
            let size = size.max(1);
            let start = ((origin * size as f64).round().max(0.0) as u32).min(size - 1);
            let len = ((extent * size as f64).round().max(1.0) as u32).min(size - start);
            (start, len.max(1))
        };

        let (x, width) = project(self.x, self.width, frame_width);
        let (y, height) = project(self.y, self.height, frame_height);

        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for NormalizedRegion {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for NormalizedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4},{:.4},{:.4},{:.4}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Error parsing a region from `x,y,width,height` text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseRegionError {
    #[error("expected 4 comma-separated numbers (x,y,width,height), got {0}")]
    WrongArity(usize),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

impl FromStr for NormalizedRegion {
    type Err = ParseRegionError;

    /// Parse `x,y,width,height`; the result is clamped into range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseRegionError::WrongArity(parts.len()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseRegionError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// An integer rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A 2D point. Used both for normalized positions and for pointer
/// positions in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_full_region_is_valid() {
        assert!(NormalizedRegion::FULL.is_valid());
        assert!(NormalizedRegion::INITIAL.is_valid());
        assert_eq!(NormalizedRegion::default(), NormalizedRegion::INITIAL);
    }

    #[test]
    fn test_new_clamps_out_of_range() {
        let region = NormalizedRegion::new(0.9, -0.2, 0.5, 0.01);
        assert!(approx(region.width, 0.5));
        assert!(approx(region.x, 0.5));
        assert!(approx(region.y, 0.0));
        assert!(approx(region.height, MIN_REGION_SIZE));
        assert!(region.is_valid());
    }

    #[test]
    fn test_clamped_replaces_nan() {
        let region = NormalizedRegion {
            x: f64::NAN,
            y: 0.1,
            width: f64::INFINITY,
            height: 0.2,
        }
        .clamped();
        assert!(region.is_valid());
        assert!(approx(region.x, 0.0));
        assert!(approx(region.width, 1.0));
    }

    #[test]
    fn test_translate_stops_at_edges() {
        let region = NormalizedRegion::new(0.6, 0.6, 0.3, 0.3);
        let moved = region.translated(0.5, -0.9);
        assert!(approx(moved.x, 0.7));
        assert!(approx(moved.y, 0.0));
        assert!(approx(moved.width, 0.3));
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let region = NormalizedRegion::new(0.2, 0.2, 0.3, 0.3);
        let shrunk = region.resized(-1.0, -1.0);
        assert!(approx(shrunk.width, MIN_REGION_SIZE));
        assert!(approx(shrunk.height, MIN_REGION_SIZE));
        let grown = region.resized(5.0, 5.0);
        assert!(approx(grown.right(), 1.0));
        assert!(approx(grown.bottom(), 1.0));
        assert!(approx(grown.x, 0.2));
    }

    #[test]
    fn test_from_edges_rejects_inverted() {
        assert!(NormalizedRegion::from_edges(0.5, 0.1, 0.4, 0.6).is_none());
        assert!(NormalizedRegion::from_edges(0.1, f64::NAN, 0.4, 0.6).is_none());
        let region = NormalizedRegion::from_edges(0.2, 0.1, 0.7, 0.6).unwrap();
        assert!(approx(region.width, 0.5));
    }

    #[test]
    fn test_pixel_rect_on_1080p() {
        let region = NormalizedRegion::new(0.25, 0.25, 0.5, 0.5);
        let rect = region.to_pixel_rect(1920, 1080);
        assert_eq!(
            rect,
            PixelRect {
                x: 480,
                y: 270,
                width: 960,
                height: 540
            }
        );
    }

    #[test]
    fn test_pixel_rect_rounding_stays_inside_frame() {
        // 0.5 * 3 = 1.5 rounds to 2 for both origin and extent.
        let region = NormalizedRegion::new(0.5, 0.5, 0.5, 0.5);
        let rect = region.to_pixel_rect(3, 3);
        assert_eq!(rect.x, 2);
        assert_eq!(rect.width, 1);
        assert!(rect.x + rect.width <= 3);
        assert!(rect.y + rect.height <= 3);
    }

    #[test]
    fn test_pixel_rect_minimum_one_pixel() {
        let region = NormalizedRegion::new(0.0, 0.0, MIN_REGION_SIZE, MIN_REGION_SIZE);
        let rect = region.to_pixel_rect(4, 4);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_parse_region() {
        let region: NormalizedRegion = "0.2, 0.1, 0.5, 0.5".parse().unwrap();
        assert!(approx(region.x, 0.2));
        assert!(approx(region.height, 0.5));

        assert_eq!(
            "0.1,0.2,0.3".parse::<NormalizedRegion>(),
            Err(ParseRegionError::WrongArity(3))
        );
        assert!(matches!(
            "a,0.2,0.3,0.4".parse::<NormalizedRegion>(),
            Err(ParseRegionError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let region = NormalizedRegion::new(0.125, 0.25, 0.5, 0.375);
        let parsed: NormalizedRegion = region.to_string().parse().unwrap();
        assert!(approx(parsed.x, region.x));
        assert!(approx(parsed.height, region.height));
    }
}
