//! Video file acceptance.

use std::path::{Path, PathBuf};

use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use serde::Serialize;

/// Message shown when a non-video file is offered.
pub const NOT_A_VIDEO: &str = "Please upload a valid video file.";

const MEDIA_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("qt", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("ts", "video/mp2t"),
    ("3gp", "video/3gpp"),
    ("3g2", "video/3gpp2"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("txt", "text/plain"),
    ("json", "application/json"),
];

/// Media type implied by a file's extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, media_type)| *media_type)
}

/// A local video file accepted for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSource {
    path: PathBuf,
    media_type: &'static str,
    size_bytes: u64,
}

impl VideoSource {
    /// Accept `path` if it exists and its media type is `video/*`.
    pub fn open(path: impl AsRef<Path>) -> FaceSnapResult<Self> {
        let path = path.as_ref();

        let media_type = media_type_for(path)
            .filter(|m| m.starts_with("video/"))
            .ok_or_else(|| {
                tracing::warn!(path = %path.display(), "Rejected non-video file");
                FaceSnapError::invalid_input(NOT_A_VIDEO)
            })?;

        let metadata = std::fs::metadata(path).map_err(|_| {
            tracing::warn!(path = %path.display(), "Video file does not exist");
            FaceSnapError::invalid_input(format!("{NOT_A_VIDEO} ({} not found)", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(FaceSnapError::invalid_input(NOT_A_VIDEO));
        }

        tracing::info!(
            path = %path.display(),
            media_type,
            size_bytes = metadata.len(),
            "Accepted video source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            media_type,
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// File name for display.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("facesnap-source-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"not really a video").unwrap();
        path
    }

    #[test]
    fn test_media_type_lookup() {
        assert_eq!(media_type_for(Path::new("a.MP4")), Some("video/mp4"));
        assert_eq!(media_type_for(Path::new("clip.webm")), Some("video/webm"));
        assert_eq!(media_type_for(Path::new("photo.png")), Some("image/png"));
        assert_eq!(media_type_for(Path::new("noext")), None);
    }

    #[test]
    fn test_accepts_video() {
        let path = temp_file("clip.mov");
        let source = VideoSource::open(&path).unwrap();
        assert_eq!(source.media_type(), "video/quicktime");
        assert_eq!(source.display_name(), "clip.mov");
        assert!(source.size_bytes() > 0);
    }

    #[test]
    fn test_rejects_image() {
        let path = temp_file("photo.jpg");
        let err = VideoSource::open(&path).unwrap_err();
        assert!(matches!(err, FaceSnapError::InvalidInput { .. }));
        assert!(err.to_string().contains(NOT_A_VIDEO));
    }

    #[test]
    fn test_rejects_missing_file() {
        let err = VideoSource::open("/definitely/not/here.mp4").unwrap_err();
        assert!(matches!(err, FaceSnapError::InvalidInput { .. }));
    }
}
