//! Show video information.

use std::path::PathBuf;

use facesnap_editor::decoder::probe_video;
use facesnap_editor::VideoSource;

pub fn run(video: PathBuf, json: bool) -> anyhow::Result<()> {
    let source = VideoSource::open(&video)?;
    let info = probe_video(source.path())
        .map_err(|e| anyhow::anyhow!("Failed to probe video: {e}"))?;

    if json {
        let value = serde_json::json!({
            "source": source,
            "video": info,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Video: {}", source.display_name());
    println!("  Path: {}", source.path().display());
    println!("  Type: {}", source.media_type());
    println!("  Size: {} bytes", source.size_bytes());
    println!("  Resolution: {}x{}", info.width, info.height);
    if info.duration_secs > 0.0 {
        println!("  Duration: {:.2}s", info.duration_secs);
    } else {
        println!("  Duration: unknown");
    }

    Ok(())
}
