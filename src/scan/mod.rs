//! Scan orchestration.
//!
//! Drives one scan through the pipeline stages (extract, parse, classify,
//! score) and tracks its status transitions. Batch scans flow through a
//! work queue drained by a dedicated worker thread.

pub mod config;
pub mod queue;
pub mod record;
pub mod store;
pub mod worker;

use crate::analysis::{analyze_label_data, IngredientLookup};
use crate::label::parse_label_text;
use crate::ocr::extract_text;
use config::ScanConfig;
use record::ScanRecord;

/// Runs the full pipeline for one scan, mutating the record through its
/// status transitions.
///
/// Extraction is the only stage that can fail; a failure marks the scan
/// FAILED with no analysis result, and the caller retries by resubmitting.
/// Parsing, classification, and scoring are total.
pub fn process_scan(
    record: &mut ScanRecord,
    lookup: Option<&dyn IngredientLookup>,
    config: &ScanConfig,
) {
    record.start();

    match extract_text(&record.image_path, &config.ocr) {
        Ok(extracted) => {
            let parsed = parse_label_text(&extracted.text);
            let analysis = analyze_label_data(&parsed, lookup, &config.thresholds);
            record.complete(extracted, parsed, analysis);
        }
        Err(e) => record.fail(e.to_string()),
    }
}
