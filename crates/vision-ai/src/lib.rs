//! FaceSnap Vision AI
//!
//! Optional AI assistance for the editor:
//! - **Proposer:** The `RegionProposer` seam the editor calls
//! - **Boxes:** Provider bounding-box conventions and their conversion
//! - **Gemini:** A Google Gemini backed proposer
//!
//! A proposer never fails loudly. Every problem on the way to a region
//! is logged and surfaces as "no face found".

pub mod boxes;
pub mod gemini;
pub mod proposer;

pub use boxes::BoxConvention;
pub use gemini::GeminiProposer;
pub use proposer::{FixedProposer, RegionProposer};
