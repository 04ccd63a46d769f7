//! FaceSnap Common Utilities
//!
//! Shared infrastructure for all FaceSnap crates:
//! - Error types and result aliases
//! - Collision-free export timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
