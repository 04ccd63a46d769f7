//! Conversion of provider bounding boxes into normalized regions.

use facesnap_common::config::{AiConfig, BoxOrder};
use facesnap_region_model::region::NormalizedRegion;
use serde::{Deserialize, Serialize};

/// How a provider lays out the four numbers of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxConvention {
    /// Coordinate order.
    pub order: BoxOrder,

    /// Value that corresponds to the full frame extent (e.g. 1000).
    pub scale: f64,
}

impl Default for BoxConvention {
    fn default() -> Self {
        Self {
            order: BoxOrder::Yxyx,
            scale: 1000.0,
        }
    }
}

impl BoxConvention {
    pub fn new(order: BoxOrder, scale: f64) -> Self {
        Self { order, scale }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.box_order, config.coordinate_scale)
    }

    /// Convert a raw box to a normalized region.
    ///
    /// Returns `None` for non-finite values, a non-positive scale, or a
    /// box with no extent. Boxes reaching outside the frame are clamped.
    pub fn to_region(&self, raw: [f64; 4]) -> Option<NormalizedRegion> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return None;
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let (left, top, right, bottom) = match self.order {
            BoxOrder::Yxyx => (raw[1], raw[0], raw[3], raw[2]),
            BoxOrder::Xyxy => (raw[0], raw[1], raw[2], raw[3]),
        };

        NormalizedRegion::from_edges(
            left / self.scale,
            top / self.scale,
            right / self.scale,
            bottom / self.scale,
        )
    }

    /// Like [`to_region`](Self::to_region) for a box of unknown arity.
    pub fn to_region_from_slice(&self, raw: &[f64]) -> Option<NormalizedRegion> {
        let raw: [f64; 4] = raw.try_into().ok()?;
        self.to_region(raw)
    }
}
