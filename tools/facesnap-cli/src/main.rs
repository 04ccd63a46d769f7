//! FaceSnap CLI: grab a face from a video frame and export it.
//!
//! Usage:
//!   facesnap extract <VIDEO>   Capture a region of a frame and save it
//!   facesnap detect <VIDEO>    Ask the vision model where the face is
//!   facesnap info <VIDEO>      Show video information
//!   facesnap check             Check system capabilities
//!   facesnap config            Show or write the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facesnap_common::config::AppConfig;
use facesnap_common::error::FaceSnapError;
use facesnap_region_model::{ExportFormat, NormalizedRegion};

mod commands;

#[derive(Parser)]
#[command(
    name = "facesnap",
    about = "Select a face on a video frame and export it as an image",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a region of one frame and export it
    Extract {
        /// Path to the video file
        video: PathBuf,

        /// Frame timestamp (seconds)
        #[arg(long, default_value = "0")]
        at: f64,

        /// Selection as normalized "x,y,width,height"
        #[arg(long)]
        region: Option<NormalizedRegion>,

        /// Let the vision model propose the selection
        #[arg(long)]
        auto: bool,

        /// Output format: png|jpeg (defaults to config)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Output scale relative to the captured region
        #[arg(long)]
        scale: Option<f64>,

        /// JPEG quality in (0, 1]
        #[arg(long)]
        quality: Option<f64>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filename prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Copy the captured image's data URI to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Propose a face region for one frame
    Detect {
        /// Path to the video file
        video: PathBuf,

        /// Frame timestamp (seconds)
        #[arg(long, default_value = "0")]
        at: f64,
    },

    /// Show video information
    Info {
        /// Path to the video file
        video: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check system capabilities
    Check,

    /// Show the configuration, or write the defaults
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    facesnap_common::logging::init_logging(&logging);

    let result = match cli.command {
        Commands::Extract {
            video,
            at,
            region,
            auto,
            format,
            scale,
            quality,
            output,
            prefix,
            copy,
        } => {
            let args = commands::extract::ExtractArgs {
                video,
                at,
                region,
                auto,
                format,
                scale,
                quality,
                output,
                prefix,
                copy,
            };
            commands::extract::run(&config, args).await
        }
        Commands::Detect { video, at } => commands::detect::run(&config, video, at).await,
        Commands::Info { video, json } => commands::info::run(video, json),
        Commands::Check => commands::check::run(&config),
        Commands::Config { init } => commands::config::run(&config, init),
    };

    if let Err(err) = &result {
        if let Some(hint) = retry_hint(err) {
            eprintln!("{hint}");
        }
    }
    result
}

/// Suggestion printed after failures that may succeed when run again.
fn retry_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<FaceSnapError>())
        .any(FaceSnapError::is_retryable)
        .then_some("This failure may be transient; running the command again may succeed.")
}
