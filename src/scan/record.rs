//! Scan records and their status lifecycle.
//!
//! A record tracks one label scan from intake through processing to a
//! terminal state: PENDING -> PROCESSING -> COMPLETED | FAILED. Records
//! have no identity beyond their id; a retry is a new scan.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::label::ParsedLabel;
use crate::ocr::ExtractedText;

/// Lifecycle status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Pending => "PENDING",
            ScanStatus::Processing => "PROCESSING",
            ScanStatus::Completed => "COMPLETED",
            ScanStatus::Failed => "FAILED",
        }
    }
}

/// One label scan: input image, status, and the pipeline's outputs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub image_path: PathBuf,
    pub status: ScanStatus,
    pub created_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(rename = "extractedData", skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ParsedLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_score: Option<i32>,
    #[serde(rename = "analysisResult", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanRecord {
    /// Creates a pending record for a submitted image.
    pub fn new(id: String, image_path: PathBuf) -> Self {
        Self {
            id,
            image_path,
            status: ScanStatus::Pending,
            created_at: Local::now(),
            completed_at: None,
            ocr_text: None,
            confidence: None,
            product_name: None,
            extracted: None,
            health_score: None,
            analysis: None,
            error: None,
        }
    }

    /// Marks the record as being processed.
    pub fn start(&mut self) {
        self.status = ScanStatus::Processing;
    }

    /// Stores the pipeline outputs and moves to the completed state.
    pub fn complete(
        &mut self,
        extracted: ExtractedText,
        parsed: ParsedLabel,
        analysis: AnalysisResult,
    ) {
        self.status = ScanStatus::Completed;
        self.completed_at = Some(Local::now());
        self.ocr_text = Some(extracted.text);
        self.confidence = Some(extracted.confidence);
        self.product_name = parsed.product_name.clone();
        self.health_score = Some(analysis.overall_score);
        self.extracted = Some(parsed);
        self.analysis = Some(analysis);
    }

    /// Records a terminal failure with no analysis result.
    pub fn fail(&mut self, error: String) {
        self.status = ScanStatus::Failed;
        self.completed_at = Some(Local::now());
        self.error = Some(error);
    }
}

/// Builds a scan id from the current time and a sequence number.
pub fn new_scan_id(seq: u32) -> String {
    format!("scan-{}-{:03}", Local::now().format("%Y%m%d-%H%M%S"), seq)
}
