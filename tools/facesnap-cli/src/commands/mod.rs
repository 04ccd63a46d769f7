pub mod check;
pub mod config;
pub mod detect;
pub mod extract;
pub mod info;

use std::path::Path;

use facesnap_editor::{EditingSession, FfmpegFrameSource, VideoSource};
use facesnap_render_engine::ExportRenderer;

/// Open `video` in a fresh session with the playhead at `at` seconds.
pub(crate) fn open_session(
    video: &Path,
    at: f64,
    renderer: ExportRenderer,
) -> anyhow::Result<EditingSession> {
    let source = VideoSource::open(video)?;
    let frames = FfmpegFrameSource::open(&source)?;

    let mut session = EditingSession::with_renderer(renderer);
    session.open_video(source, Box::new(frames))?;
    let playhead = session.seek(at)?;
    if (playhead - at).abs() > f64::EPSILON {
        tracing::warn!(requested = at, playhead, "Seek target clamped to video duration");
    }
    Ok(session)
}
