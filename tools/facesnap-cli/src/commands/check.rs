//! Check system capabilities.

use facesnap_common::config::AppConfig;
use facesnap_editor::decoder::command_exists;
use facesnap_editor::SystemClipboard;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("FaceSnap System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;
    for tool in ["ffmpeg", "ffprobe"] {
        if command_exists(tool) {
            println!("[OK] {tool} found");
        } else {
            println!("[MISSING] {tool} (required to decode video frames)");
            ready = false;
        }
    }

    if config.ai.api_key().is_some() {
        println!("[OK] API key available for {}", config.ai.model);
    } else {
        println!(
            "[WARN] No API key (set {}); --auto detection disabled",
            config.ai.api_key_env.join(" or ")
        );
    }

    match SystemClipboard::open() {
        Ok(_) => println!("[OK] Clipboard available"),
        Err(e) => println!("[WARN] {e}; --copy disabled"),
    }

    println!();
    if ready {
        println!("All required tools are available. FaceSnap is ready.");
    } else {
        println!("Some required tools are missing. See above.");
    }

    Ok(())
}
