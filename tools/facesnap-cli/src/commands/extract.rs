//! Capture a region of one frame and export it.

use std::path::PathBuf;

use facesnap_common::config::AppConfig;
use facesnap_editor::{DetectionOutcome, SystemClipboard};
use facesnap_region_model::{ExportFormat, ExportSettings, NormalizedRegion};
use facesnap_render_engine::ExportRenderer;
use facesnap_vision_ai::GeminiProposer;

pub struct ExtractArgs {
    pub video: PathBuf,
    pub at: f64,
    pub region: Option<NormalizedRegion>,
    pub auto: bool,
    pub format: Option<ExportFormat>,
    pub scale: Option<f64>,
    pub quality: Option<f64>,
    pub output: Option<PathBuf>,
    pub prefix: Option<String>,
    pub copy: bool,
}

pub async fn run(config: &AppConfig, args: ExtractArgs) -> anyhow::Result<()> {
    let defaults = ExportSettings::from_defaults(&config.export)
        .map_err(|e| anyhow::anyhow!("Invalid export defaults in config: {e}"))?;
    let settings = ExportSettings {
        format: args.format.unwrap_or(defaults.format),
        scale: args.scale.unwrap_or(defaults.scale),
        quality: args.quality.unwrap_or(defaults.quality),
    };
    settings.validate()?;

    let prefix = args
        .prefix
        .unwrap_or_else(|| config.export.filename_prefix.clone());
    let output_dir = args
        .output
        .unwrap_or_else(|| config.export.output_dir.clone());

    println!("Extracting from: {}", args.video.display());
    let mut session =
        super::open_session(&args.video, args.at, ExportRenderer::with_prefix(prefix))?;

    if let Some(info) = session.video_info() {
        println!(
            "  Video: {}x{} ({:.1}s)",
            info.width, info.height, info.duration_secs
        );
    }
    if let Some(playhead) = session.playhead_secs() {
        println!("  Frame: {playhead:.3}s");
    }

    if let Some(region) = args.region {
        session.set_region(region)?;
    }

    if args.auto {
        let proposer = GeminiProposer::from_config(&config.ai)?;
        if !proposer.has_api_key() {
            println!("  [WARN] No API key found; keeping the manual selection");
        } else {
            match session.detect(&proposer).await? {
                DetectionOutcome::Applied(region) => println!("  Detected face: {region}"),
                DetectionOutcome::NoFace => {
                    println!("  No face detected; keeping the current selection")
                }
                DetectionOutcome::Discarded => {}
            }
        }
    }

    if let Some(region) = session.region() {
        println!("  Region: {region}");
    }

    let captured = session.capture()?;
    println!(
        "  Captured: {}x{}",
        captured.raster.width(),
        captured.raster.height()
    );

    let rendered = session.export(&settings)?;
    let path = rendered.save(&output_dir)?;
    println!(
        "  Exported: {} ({}x{}, {})",
        path.display(),
        rendered.width,
        rendered.height,
        rendered.format
    );

    if args.copy {
        match SystemClipboard::open() {
            Ok(mut clipboard) => {
                session.copy_to_clipboard(&mut clipboard)?;
                println!("  Copied data URI to the clipboard");
            }
            Err(e) => println!("  [WARN] {e}"),
        }
    }

    Ok(())
}
