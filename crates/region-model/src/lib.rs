//! FaceSnap Region Model
//!
//! Defines the core data contracts shared by the editor and renderer:
//! - **Region:** The normalized selection rectangle and its pixel projection
//! - **Raster:** Decoded RGBA frames and crops
//! - **Settings:** Export format, scale, and quality
//!
//! All region coordinates are normalized to `[0.0, 1.0]` relative to the
//! frame so a selection is independent of the frame's resolution.

pub mod raster;
pub mod region;
pub mod settings;

pub use raster::*;
pub use region::*;
pub use settings::*;
