//! Propose a face region for one frame.

use std::path::PathBuf;

use facesnap_common::config::AppConfig;
use facesnap_editor::DetectionOutcome;
use facesnap_render_engine::ExportRenderer;
use facesnap_vision_ai::GeminiProposer;

pub async fn run(config: &AppConfig, video: PathBuf, at: f64) -> anyhow::Result<()> {
    let proposer = GeminiProposer::from_config(&config.ai)?;
    if !proposer.has_api_key() {
        anyhow::bail!(
            "No API key found. Set one of: {}",
            config.ai.api_key_env.join(", ")
        );
    }

    let mut session = super::open_session(&video, at, ExportRenderer::new())?;

    match session.detect(&proposer).await? {
        DetectionOutcome::Applied(region) => {
            println!("{region}");
            Ok(())
        }
        DetectionOutcome::NoFace | DetectionOutcome::Discarded => {
            anyhow::bail!("No face detected")
        }
    }
}
