//! Runtime configuration for the scan pipeline.
//!
//! Loads settings from config.json next to the executable at startup.
//! Every field is defaulted, so a partial or missing file works.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::analysis::NutritionThresholds;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<ScanConfig> = OnceLock::new();

/// Recognition settings passed to the Tesseract CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Language trained data to use. A single configured language; no
    /// auto-detection.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Engine mode (1 = LSTM).
    #[serde(default = "default_oem")]
    pub oem: u8,
    /// Page segmentation mode (3 = automatic).
    #[serde(default = "default_psm")]
    pub psm: u8,
}

fn default_lang() -> String {
    "eng".to_string()
}

fn default_oem() -> u8 {
    1
}

fn default_psm() -> u8 {
    3
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            oem: default_oem(),
            psm: default_psm(),
        }
    }
}

/// Complete scan pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub thresholds: NutritionThresholds,
    /// Optional ingredient risk dataset loaded at startup.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> ScanConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    }

    ScanConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration, falling back to
/// defaults if init_config() was never called.
pub fn get_config() -> &'static ScanConfig {
    CONFIG.get_or_init(ScanConfig::default)
}
