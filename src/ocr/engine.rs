use std::io;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::scan::config::OcrConfig;

/// Character-count thresholds for the confidence bands.
const HIGH_CONFIDENCE_CHARS: usize = 50;
const MEDIUM_CONFIDENCE_CHARS: usize = 20;

/// Raw recognized text plus a 0-100 confidence estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub confidence: u8,
}

/// Errors from the text extraction stage.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(
        "Tesseract not found. Install it (apt-get install tesseract-ocr / \
         brew install tesseract / choco install tesseract) and ensure it is on PATH"
    )]
    EngineMissing,
    #[error("Tesseract failed: {0}")]
    EngineFailed(String),
    #[error("no readable text found in image")]
    NoText,
    #[error("could not decode input image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Runs Tesseract on an image file and returns the recognized text with a
/// confidence estimate.
///
/// Recognition uses a fixed mode tuned for printed labels: LSTM engine
/// (--oem 1), automatic page segmentation (--psm 3), and a single
/// configured language. The input image is never modified.
pub fn extract_text(
    image_path: &Path,
    config: &OcrConfig,
) -> Result<ExtractedText, ExtractionError> {
    let tesseract_exe = find_tesseract_executable().ok_or(ExtractionError::EngineMissing)?;

    let mut cmd = Command::new(&tesseract_exe);
    cmd.arg(image_path)
        .arg("stdout")
        .arg("-l")
        .arg(&config.lang)
        .arg("--oem")
        .arg(config.oem.to_string())
        .arg("--psm")
        .arg(config.psm.to_string());

    if let Some(tessdata_dir) = find_tessdata_dir(&config.lang) {
        cmd.arg("--tessdata-dir").arg(tessdata_dir);
    }

    let output = cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ExtractionError::EngineMissing
        } else {
            ExtractionError::Io(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::EngineFailed(stderr.trim().to_string()));
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }

    let confidence = estimate_confidence(&text);
    Ok(ExtractedText { text, confidence })
}

/// Runs recognition on raw image bytes by decoding and re-encoding them to
/// a temporary PNG file.
pub fn extract_text_from_bytes(
    bytes: &[u8],
    config: &OcrConfig,
) -> Result<ExtractedText, ExtractionError> {
    let img = image::load_from_memory(bytes)?;
    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())?;
    extract_text(temp_input.path(), config)
}

/// Estimates a confidence band from output length.
///
/// The CLI does not expose a true recognition confidence, so output length
/// stands in for recognition quality: three bands keyed by character
/// count, monotonically non-decreasing with longer output. Any 0-100
/// estimate with that monotonicity could replace this.
pub fn estimate_confidence(text: &str) -> u8 {
    let chars = text.chars().count();
    if chars > HIGH_CONFIDENCE_CHARS {
        85
    } else if chars > MEDIUM_CONFIDENCE_CHARS {
        70
    } else {
        60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_band_edges() {
        assert_eq!(estimate_confidence(&"x".repeat(20)), 60);
        assert_eq!(estimate_confidence(&"x".repeat(21)), 70);
        assert_eq!(estimate_confidence(&"x".repeat(50)), 70);
        assert_eq!(estimate_confidence(&"x".repeat(51)), 85);
    }

    #[test]
    fn test_confidence_empty_text() {
        assert_eq!(estimate_confidence(""), 60);
    }

    #[test]
    fn test_confidence_monotonic_in_length() {
        let mut previous = 0;
        for len in 0..120 {
            let confidence = estimate_confidence(&"a".repeat(len));
            assert!(confidence >= previous);
            previous = confidence;
        }
    }

    #[test]
    fn test_confidence_counts_chars_not_bytes() {
        // 25 multibyte chars: medium band even though the byte count is larger
        let text = "é".repeat(25);
        assert_eq!(estimate_confidence(&text), 70);
    }

    #[test]
    fn test_undecodable_bytes_fail_before_recognition() {
        let err = extract_text_from_bytes(b"definitely not an image", &OcrConfig::default())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Image(_)));
    }

    #[test]
    fn test_engine_missing_message_names_installers() {
        let msg = ExtractionError::EngineMissing.to_string();
        assert!(msg.contains("Tesseract"));
        assert!(msg.contains("brew install"));
    }
}
