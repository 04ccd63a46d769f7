//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default export settings.
    #[serde(default)]
    pub export: ExportDefaults,

    /// External vision model settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDefaults {
    /// Output format name ("png" or "jpeg").
    pub format: String,

    /// Output scale relative to the captured region.
    pub scale: f64,

    /// Lossy encoder quality in (0, 1]. Only used for JPEG.
    pub quality: f64,

    /// Filename prefix for exported images.
    pub filename_prefix: String,

    /// Directory exported images are written to.
    pub output_dir: PathBuf,
}

/// Ordering of the four numbers in a provider bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxOrder {
    /// `[ymin, xmin, ymax, xmax]`
    Yxyx,
    /// `[xmin, ymin, xmax, ymax]`
    Xyxy,
}

/// External vision model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Model identifier sent to the provider.
    pub model: String,

    /// Base URL of the provider API.
    pub endpoint: String,

    /// Environment variables consulted (in order) for the API key.
    pub api_key_env: Vec<String>,

    /// Ordering of the returned box coordinates.
    pub box_order: BoxOrder,

    /// Upper bound of the provider's coordinate scale (e.g. 1000).
    pub coordinate_scale: f64,

    /// JPEG quality used to ship the frame to the provider, in (0, 1].
    pub transport_quality: f64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facesnap=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            scale: 1.0,
            quality: 0.92,
            filename_prefix: "extracted_face".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: vec!["GEMINI_API_KEY".to_string(), "API_KEY".to_string()],
            box_order: BoxOrder::Yxyx,
            coordinate_scale: 1000.0,
            transport_quality: 0.8,
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AiConfig {
    /// First non-empty API key found in the configured environment variables.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location, returning the path written.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facesnap").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"export":{"format":"jpeg","scale":2.0,"quality":0.8,"filename_prefix":"face","output_dir":"out"}}"#)
                .unwrap();
        assert_eq!(config.export.format, "jpeg");
        assert_eq!(config.ai.box_order, BoxOrder::Yxyx);
        assert_eq!(config.ai.coordinate_scale, 1000.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_box_order_serializes_lowercase() {
        let json = serde_json::to_string(&BoxOrder::Xyxy).unwrap();
        assert_eq!(json, "\"xyxy\"");
    }

    #[test]
    fn test_api_key_skips_missing_variables() {
        let config = AiConfig {
            api_key_env: vec!["FACESNAP_TEST_UNSET_KEY_VAR".to_string()],
            ..AiConfig::default()
        };
        assert!(config.api_key().is_none());
    }
}
