//! Frame decoding through the platform's `ffmpeg`/`ffprobe`.

use std::path::{Path, PathBuf};
use std::process::Command;

use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use facesnap_region_model::raster::RasterImage;
use serde::Serialize;

use crate::source::VideoSource;

/// Stream facts needed by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Zero when the container does not report a duration.
    pub duration_secs: f64,
}

impl VideoInfo {
    /// Clamp a seek target into `[0, duration]`.
    pub fn clamp_time(&self, secs: f64) -> f64 {
        secs.clamp(0.0, self.duration_secs.max(0.0))
    }
}

/// Anything that can hand out decoded frames of one video.
pub trait FrameSource: Send {
    /// Dimensions and duration of the video.
    fn info(&self) -> VideoInfo;

    /// Decode the frame shown at `secs`.
    fn frame_at(&mut self, secs: f64) -> FaceSnapResult<RasterImage>;
}

/// [`FrameSource`] that shells out to `ffmpeg` per frame.
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: VideoInfo,
}

impl FfmpegFrameSource {
    /// Probe `source` and prepare to decode it.
    pub fn open(source: &VideoSource) -> FaceSnapResult<Self> {
        if !command_exists("ffprobe") || !command_exists("ffmpeg") {
            return Err(FaceSnapError::platform(
                "ffmpeg and ffprobe are required to decode video frames",
            ));
        }
        let info = probe_video(source.path())?;
        tracing::info!(
            path = %source.path().display(),
            width = info.width,
            height = info.height,
            duration_secs = info.duration_secs,
            "Probed video"
        );
        Ok(Self {
            path: source.path().to_path_buf(),
            info,
        })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn frame_at(&mut self, secs: f64) -> FaceSnapResult<RasterImage> {
        let secs = self.info.clamp_time(secs);
        let output = Command::new("ffmpeg")
            .args(["-v", "error", "-ss"])
            .arg(format!("{secs:.3}"))
            .arg("-i")
            .arg(&self.path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FaceSnapError::decode(format!(
                "ffmpeg failed at {secs:.3}s: {}",
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(FaceSnapError::decode(format!(
                "No frame decoded at {secs:.3}s"
            )));
        }

        let frame = RasterImage::decode(&output.stdout)?;
        tracing::debug!(
            secs,
            width = frame.width(),
            height = frame.height(),
            "Decoded frame"
        );
        Ok(frame)
    }
}

/// Whether `binary` is on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Probe dimensions and duration with `ffprobe`.
pub fn probe_video(path: &Path) -> FaceSnapResult<VideoInfo> {
    let (width, height) = probe_video_dimensions(path).ok_or_else(|| {
        FaceSnapError::decode(format!("No video stream found in {}", path.display()))
    })?;
    let duration_secs = probe_duration(path).unwrap_or(0.0);
    Ok(VideoInfo {
        width,
        height,
        duration_secs,
    })
}

fn probe_video_dimensions(path: &Path) -> Option<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_dimensions(&String::from_utf8(output.stdout).ok()?)
}

fn probe_duration(path: &Path) -> Option<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_duration(&String::from_utf8(output.stdout).ok()?)
}

fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let line = raw.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.trim().parse::<u32>().ok()?;
    let height = h.trim().trim_end_matches('x').parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

// "N/A" for streams without a container duration.
fn parse_duration(raw: &str) -> Option<f64> {
    let secs = raw.lines().next()?.trim().parse::<f64>().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}
