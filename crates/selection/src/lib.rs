//! FaceSnap Selection
//!
//! Turns pointer gestures into updates of the single crop region:
//! - **Move:** drag the selection body, translating the region
//! - **Resize:** drag the bottom-right handle, growing or shrinking it
//!
//! Pure computation: no I/O, no platform dependencies.
//! Gestures go in as pointer positions; the region comes out.

pub mod controller;

pub use controller::{ContainerSize, DragMode, SelectionController};
