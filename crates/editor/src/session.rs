//! The editing session: `Upload -> Editor -> Preview`.
//!
//! The session owns the one selection region, the decoded video and any
//! captured result. Leaving the editor drops those resources and bumps a
//! generation counter, so an AI answer that arrives for an editor that no
//! longer exists is recognized and thrown away.

use std::fmt;

use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use facesnap_region_model::raster::RasterImage;
use facesnap_region_model::region::{NormalizedRegion, Point2D};
use facesnap_region_model::settings::{ExportFormat, ExportSettings};
use facesnap_render_engine::{
    capture, capture_full, data_uri, encode_png, ExportRenderer, RenderedImage,
};
use facesnap_selection::{ContainerSize, DragMode, SelectionController};
use facesnap_vision_ai::RegionProposer;

use crate::clipboard::ClipboardSink;
use crate::decoder::{FrameSource, VideoInfo};
use crate::source::VideoSource;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Upload,
    Editor,
    Preview,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Upload => "upload",
            Screen::Editor => "editor",
            Screen::Preview => "preview",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Proof that a detection was started, and for which editor.
///
/// Not `Clone`: a ticket completes at most once.
#[derive(Debug)]
pub struct DetectionTicket {
    generation: u64,
    flight: u64,
    frame: RasterImage,
}

impl DetectionTicket {
    /// Full-frame raster to hand to the proposer.
    pub fn frame(&self) -> &RasterImage {
        &self.frame
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a detection result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionOutcome {
    /// The proposal replaced the region.
    Applied(NormalizedRegion),
    /// No face was found; the region is untouched.
    NoFace,
    /// The editor the detection was started for is gone.
    Discarded,
}

/// The raster captured from the editor and its PNG preview encoding.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub raster: RasterImage,
    pub preview_png: Vec<u8>,
}

struct EditorState {
    source: VideoSource,
    frames: Box<dyn FrameSource>,
    info: VideoInfo,
    selection: SelectionController,
    playhead_secs: f64,
    cached_frame: Option<(f64, RasterImage)>,
    // Id of the detection this editor is waiting on.
    in_flight: Option<u64>,
}

impl EditorState {
    fn frame(&mut self) -> FaceSnapResult<&RasterImage> {
        let stale = self
            .cached_frame
            .as_ref()
            .map_or(true, |(secs, _)| *secs != self.playhead_secs);
        if stale {
            let frame = self.frames.frame_at(self.playhead_secs)?;
            self.cached_frame = Some((self.playhead_secs, frame));
        }
        self.cached_frame
            .as_ref()
            .map(|(_, frame)| frame)
            .ok_or_else(|| FaceSnapError::decode("No frame available"))
    }

    fn ensure_idle(&self, action: &str) -> FaceSnapResult<()> {
        if self.in_flight.is_some() {
            return Err(FaceSnapError::busy(format!(
                "cannot {action} while face detection is running"
            )));
        }
        Ok(())
    }
}

enum State {
    Upload,
    Editor(EditorState),
    Preview {
        editor: EditorState,
        result: CaptureResult,
    },
}

/// One user's trip through upload, editing and export.
pub struct EditingSession {
    state: State,
    generation: u64,
    flights: u64,
    renderer: ExportRenderer,
}

impl EditingSession {
    pub fn new() -> Self {
        Self::with_renderer(ExportRenderer::new())
    }

    pub fn with_renderer(renderer: ExportRenderer) -> Self {
        Self {
            state: State::Upload,
            generation: 0,
            flights: 0,
            renderer,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.state {
            State::Upload => Screen::Upload,
            State::Editor(_) => Screen::Editor,
            State::Preview { .. } => Screen::Preview,
        }
    }

    /// Counter bumped whenever the editor is left.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The selection, while a video is open.
    pub fn region(&self) -> Option<NormalizedRegion> {
        self.editor().map(|e| e.selection.region())
    }

    pub fn playhead_secs(&self) -> Option<f64> {
        self.editor().map(|e| e.playhead_secs)
    }

    pub fn video_info(&self) -> Option<VideoInfo> {
        self.editor().map(|e| e.info)
    }

    pub fn source(&self) -> Option<&VideoSource> {
        self.editor().map(|e| &e.source)
    }

    pub fn is_detecting(&self) -> bool {
        self.editor().is_some_and(|e| e.in_flight.is_some())
    }

    /// Captured result, on the preview screen.
    pub fn captured(&self) -> Option<&CaptureResult> {
        match &self.state {
            State::Preview { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Upload -> Editor.
    pub fn open_video(
        &mut self,
        source: VideoSource,
        frames: Box<dyn FrameSource>,
    ) -> FaceSnapResult<()> {
        if !matches!(self.state, State::Upload) {
            return Err(self.invalid("open a video"));
        }

        let info = frames.info();
        if info.width == 0 || info.height == 0 {
            return Err(FaceSnapError::invalid_input(format!(
                "{} has no decodable video stream",
                source.display_name()
            )));
        }

        tracing::info!(
            video = %source.display_name(),
            width = info.width,
            height = info.height,
            duration_secs = info.duration_secs,
            "Opened video in editor"
        );

        self.state = State::Editor(EditorState {
            source,
            frames,
            info,
            selection: SelectionController::new(),
            playhead_secs: 0.0,
            cached_frame: None,
            in_flight: None,
        });
        Ok(())
    }

    /// Editor -> Upload, dropping the video.
    pub fn back_to_upload(&mut self) -> FaceSnapResult<()> {
        if !matches!(self.state, State::Editor(_)) {
            return Err(self.invalid("go back to upload"));
        }
        self.leave_editor(State::Upload);
        tracing::info!("Returned to upload");
        Ok(())
    }

    /// Any screen -> Upload, dropping everything.
    pub fn reset(&mut self) {
        let was = self.screen();
        self.leave_editor(State::Upload);
        tracing::info!(from = %was, generation = self.generation, "Session reset");
    }

    /// Move the playhead, clamped to the video's duration.
    pub fn seek(&mut self, secs: f64) -> FaceSnapResult<f64> {
        if !secs.is_finite() {
            return Err(FaceSnapError::invalid_input(format!(
                "seek target must be finite, got {secs}"
            )));
        }
        let editor = self.editor_mut("seek")?;
        editor.playhead_secs = editor.info.clamp_time(secs);
        tracing::debug!(playhead_secs = editor.playhead_secs, "Seeked");
        Ok(editor.playhead_secs)
    }

    /// Decoded frame at the playhead (cached until the next seek).
    pub fn current_frame(&mut self) -> FaceSnapResult<&RasterImage> {
        self.editor_mut("view a frame")?.frame()
    }

    pub fn begin_drag(&mut self, mode: DragMode, pointer: Point2D) -> FaceSnapResult<()> {
        let editor = self.editor_mut("adjust the selection")?;
        editor.ensure_idle("adjust the selection")?;
        editor.selection.begin_drag(mode, pointer);
        Ok(())
    }

    /// Returns whether a drag was active.
    pub fn update_drag(
        &mut self,
        pointer: Point2D,
        container: ContainerSize,
    ) -> FaceSnapResult<bool> {
        let editor = self.editor_mut("adjust the selection")?;
        editor.ensure_idle("adjust the selection")?;
        Ok(editor.selection.update_drag(pointer, container))
    }

    pub fn end_drag(&mut self) -> FaceSnapResult<()> {
        self.editor_mut("adjust the selection")?.selection.end_drag();
        Ok(())
    }

    pub fn set_region(&mut self, region: NormalizedRegion) -> FaceSnapResult<()> {
        let editor = self.editor_mut("set the selection")?;
        editor.ensure_idle("set the selection")?;
        editor.selection.set_region(region);
        Ok(())
    }

    /// Start an AI detection on the current frame.
    pub fn begin_detection(&mut self) -> FaceSnapResult<DetectionTicket> {
        let generation = self.generation;
        let flight = self.flights + 1;
        let editor = self.editor_mut("detect a face")?;
        editor.ensure_idle("start another detection")?;

        let frame = capture_full(editor.frame()?);
        editor.selection.end_drag();
        editor.in_flight = Some(flight);
        self.flights = flight;

        tracing::info!(
            generation,
            flight,
            width = frame.width(),
            height = frame.height(),
            "Face detection started"
        );
        Ok(DetectionTicket {
            generation,
            flight,
            frame,
        })
    }

    /// Apply (or discard) the answer for `ticket`.
    pub fn complete_detection(
        &mut self,
        ticket: DetectionTicket,
        proposal: Option<NormalizedRegion>,
    ) -> DetectionOutcome {
        let live = self.generation;
        let editor = match &mut self.state {
            State::Editor(editor)
                if ticket.generation == live && editor.in_flight == Some(ticket.flight) =>
            {
                editor
            }
            _ => {
                tracing::info!(
                    ticket_generation = ticket.generation,
                    flight = ticket.flight,
                    live_generation = live,
                    "Discarding stale detection result"
                );
                return DetectionOutcome::Discarded;
            }
        };

        editor.in_flight = None;
        match proposal {
            Some(region) => {
                editor.selection.set_region(region);
                let applied = editor.selection.region();
                tracing::info!(region = %applied, "Applied detected region");
                DetectionOutcome::Applied(applied)
            }
            None => {
                tracing::info!("No face detected; selection unchanged");
                DetectionOutcome::NoFace
            }
        }
    }

    /// Give up on `ticket` without touching the region.
    ///
    /// Returns whether the ticket still belonged to the live editor.
    pub fn cancel_detection(&mut self, ticket: &DetectionTicket) -> bool {
        self.abandon_detection(ticket.generation, ticket.flight)
    }

    /// Run one detection round trip with `proposer`.
    ///
    /// Dropping the returned future (a timeout, a cancelled task) clears
    /// the in-flight flag, so the editor never stays busy.
    pub async fn detect(
        &mut self,
        proposer: &dyn RegionProposer,
    ) -> FaceSnapResult<DetectionOutcome> {
        let ticket = self.begin_detection()?;
        let guard = InFlightDetection {
            session: Some(self),
            generation: ticket.generation,
            flight: ticket.flight,
        };
        let proposal = proposer.propose(ticket.frame()).await;
        Ok(guard.finish(ticket, proposal))
    }

    fn abandon_detection(&mut self, generation: u64, flight: u64) -> bool {
        let live = self.generation;
        match &mut self.state {
            State::Editor(editor) if generation == live && editor.in_flight == Some(flight) => {
                editor.in_flight = None;
                tracing::info!(generation, flight, "Face detection cancelled");
                true
            }
            _ => false,
        }
    }

    /// Editor -> Preview: crop the current frame.
    pub fn capture(&mut self) -> FaceSnapResult<&CaptureResult> {
        let editor = self.editor_mut("capture")?;
        editor.ensure_idle("capture")?;

        let region = editor.selection.region();
        let raster = capture(editor.frame()?, &region);
        let preview_png = encode_png(&raster)?;

        tracing::info!(
            region = %region,
            width = raster.width(),
            height = raster.height(),
            "Captured selection"
        );

        let result = CaptureResult {
            raster,
            preview_png,
        };
        let State::Editor(mut editor) = std::mem::replace(&mut self.state, State::Upload) else {
            return Err(self.invalid("capture"));
        };
        editor.selection.end_drag();
        self.generation += 1;
        self.state = State::Preview { editor, result };

        self.captured()
            .ok_or_else(|| FaceSnapError::render("Capture result missing"))
    }

    /// Preview -> Editor, keeping the region and playhead.
    pub fn back_to_editor(&mut self) -> FaceSnapResult<()> {
        if !matches!(self.state, State::Preview { .. }) {
            return Err(self.invalid("go back to the editor"));
        }
        if let State::Preview { editor, .. } = std::mem::replace(&mut self.state, State::Upload) {
            self.state = State::Editor(editor);
        }
        tracing::info!("Returned to editor");
        Ok(())
    }

    /// Render the captured region for download.
    pub fn export(&self, settings: &ExportSettings) -> FaceSnapResult<RenderedImage> {
        let result = self.preview_result("export")?;
        self.renderer.render(&result.raster, settings)
    }

    /// `data:image/png;base64,...` of the previewed image.
    pub fn preview_data_uri(&self) -> FaceSnapResult<String> {
        let result = self.preview_result("copy the image")?;
        Ok(data_uri(&result.preview_png, ExportFormat::Png))
    }

    pub fn copy_to_clipboard(&self, sink: &mut dyn ClipboardSink) -> FaceSnapResult<()> {
        let uri = self.preview_data_uri()?;
        sink.copy_text(&uri)
    }

    fn editor(&self) -> Option<&EditorState> {
        match &self.state {
            State::Editor(editor) | State::Preview { editor, .. } => Some(editor),
            State::Upload => None,
        }
    }

    // Only the editor screen itself; the preview keeps its editor frozen.
    fn editor_mut(&mut self, action: &'static str) -> FaceSnapResult<&mut EditorState> {
        let screen = self.screen();
        match &mut self.state {
            State::Editor(editor) => Ok(editor),
            _ => Err(FaceSnapError::InvalidTransition {
                state: screen.name(),
                action,
            }),
        }
    }

    fn preview_result(&self, action: &'static str) -> FaceSnapResult<&CaptureResult> {
        self.captured().ok_or_else(|| self.invalid(action))
    }

    fn leave_editor(&mut self, next: State) {
        if !matches!(self.state, State::Upload) {
            self.generation += 1;
        }
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> FaceSnapError {
        FaceSnapError::InvalidTransition {
            state: self.screen().name(),
            action,
        }
    }
}

/// Cancels its detection on drop unless it was finished.
struct InFlightDetection<'a> {
    session: Option<&'a mut EditingSession>,
    generation: u64,
    flight: u64,
}

impl InFlightDetection<'_> {
    fn finish(
        mut self,
        ticket: DetectionTicket,
        proposal: Option<NormalizedRegion>,
    ) -> DetectionOutcome {
        match self.session.take() {
            Some(session) => session.complete_detection(ticket, proposal),
            None => DetectionOutcome::Discarded,
        }
    }
}

impl Drop for InFlightDetection<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.abandon_detection(self.generation, self.flight);
        }
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingSession")
            .field("screen", &self.screen())
            .field("generation", &self.generation)
            .field("region", &self.region())
            .field("detecting", &self.is_detecting())
            .finish()
    }
}
