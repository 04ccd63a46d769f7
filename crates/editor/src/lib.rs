//! FaceSnap Editor
//!
//! Everything between "the user picked a file" and "an image was
//! exported":
//! - **Source:** Accepts video files by media type
//! - **Decoder:** Probes and decodes frames through `ffmpeg`
//! - **Session:** The upload/editor/preview state machine
//! - **Clipboard:** Sinks for the previewed image's data URI

pub mod clipboard;
pub mod decoder;
pub mod session;
pub mod source;

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use decoder::{FfmpegFrameSource, FrameSource, VideoInfo};
pub use session::{CaptureResult, DetectionOutcome, DetectionTicket, EditingSession, Screen};
pub use source::VideoSource;
