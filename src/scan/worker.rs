//! Scan worker thread.
//!
//! Runs in a separate thread, receiving scan jobs from the work queue and
//! driving each through the pipeline. Results are persisted to the
//! results directory. Failures are per-job: a bad image marks that scan
//! FAILED and the worker moves on.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::analysis::{IngredientLookup, RiskDataset};

use super::config::ScanConfig;
use super::queue::ScanJob;
use super::record::{ScanRecord, ScanStatus};
use super::store;

/// Runs the scan worker loop.
///
/// Processes jobs from the queue until the channel is closed (sender
/// dropped). This function blocks until then, so it should be run in a
/// dedicated thread. The dataset is shared read-only and needs no
/// locking.
pub fn run_scan_worker(
    receiver: Receiver<ScanJob>,
    results_dir: PathBuf,
    dataset: Option<Arc<RiskDataset>>,
    config: ScanConfig,
) {
    crate::log("Scan worker started");

    loop {
        match receiver.recv() {
            Ok(job) => {
                crate::log(&format!(
                    "Scan worker: processing {} ({}, queued {})",
                    job.scan_id,
                    job.image_path.display(),
                    job.queued_at.format("%H:%M:%S")
                ));

                let mut record = ScanRecord::new(job.scan_id, job.image_path);
                let lookup = dataset.as_deref().map(|d| d as &dyn IngredientLookup);
                super::process_scan(&mut record, lookup, &config);

                match record.status {
                    ScanStatus::Completed => crate::log(&format!(
                        "Scan {} completed with score {}",
                        record.id,
                        record.health_score.unwrap_or(0)
                    )),
                    _ => crate::log(&format!(
                        "Scan {} failed: {}",
                        record.id,
                        record.error.as_deref().unwrap_or("unknown error")
                    )),
                }

                if let Err(e) = store::write_record(&results_dir, &record) {
                    crate::log(&format!(
                        "Scan worker: failed to write record for {}: {}",
                        record.id, e
                    ));
                    continue; // Skip the index row, move on to the next job
                }

                if let Err(e) = store::append_index(&results_dir.join("scans.csv"), &record) {
                    crate::log(&format!(
                        "Scan worker: failed to update index for {}: {}",
                        record.id, e
                    ));
                }
            }
            Err(_) => {
                // Channel closed, sender was dropped
                crate::log("Scan worker: channel closed, exiting");
                break;
            }
        }
    }

    crate::log("Scan worker finished");
}
