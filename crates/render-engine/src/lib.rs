//! FaceSnap Render Engine
//!
//! Turns a decoded video frame plus a normalized selection into an
//! exported image file.
//!
//! # Pipeline
//!
//! ```text
//! frame (W x H) ──┐
//!                 ├── Capture (pixel-exact crop, no resampling)
//! region ─────────┘         │
//!                           ├── Scale (Lanczos3 when scale != 1)
//! settings ─────────────────┘         │
//!                                     ├── PNG (RGBA, lossless)
//!                                     └── JPEG (flattened onto white)
//!                                               │
//!                                               ▼
//!                              file / data URI / clipboard
//! ```

pub mod capture;
pub mod export;

pub use capture::{capture, capture_full, capture_rect};
pub use export::*;
