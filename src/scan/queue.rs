//! Work queue for passing scan jobs to the worker thread.
//!
//! Uses std::sync::mpsc for single-producer, single-consumer
//! communication. The intake side enqueues submitted images, the scan
//! worker receives and processes them.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A queued label scan.
#[derive(Debug, Clone)]
pub struct ScanJob {
    /// Identifier the resulting record will carry
    pub scan_id: String,
    /// Path to the submitted label image
    pub image_path: PathBuf,
    /// Timestamp when the job was queued
    pub queued_at: DateTime<Local>,
}

impl ScanJob {
    /// Creates a new scan job.
    pub fn new(scan_id: String, image_path: PathBuf) -> Self {
        Self {
            scan_id,
            image_path,
            queued_at: Local::now(),
        }
    }
}

/// Creates a new scan queue.
///
/// Returns a tuple of (sender, receiver):
/// - The sender is used by the intake side to queue images
/// - The receiver is used by the scan worker thread to process them
///
/// The channel is unbounded - jobs will queue up if OCR is slower than
/// intake.
pub fn create_scan_queue() -> (Sender<ScanJob>, Receiver<ScanJob>) {
    channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_scan_queue_send_receive() {
        let (sender, receiver) = create_scan_queue();

        let job = ScanJob::new("scan-1".to_string(), PathBuf::from("labels/front.png"));
        sender.send(job).expect("Failed to send");

        let received = receiver.recv().expect("Failed to receive");
        assert_eq!(received.scan_id, "scan-1");
        assert_eq!(received.image_path, PathBuf::from("labels/front.png"));
    }

    #[test]
    fn test_scan_queue_preserves_order() {
        let (sender, receiver) = create_scan_queue();

        for i in 1..=5 {
            let job = ScanJob::new(format!("scan-{}", i), PathBuf::from(format!("{}.png", i)));
            sender.send(job).expect("Failed to send");
        }

        for i in 1..=5 {
            let received = receiver.recv().expect("Failed to receive");
            assert_eq!(received.scan_id, format!("scan-{}", i));
        }
    }

    #[test]
    fn test_channel_closes_when_sender_dropped() {
        let (sender, receiver) = create_scan_queue();

        sender
            .send(ScanJob::new("scan-1".to_string(), PathBuf::from("a.png")))
            .unwrap();

        drop(sender);

        // First recv should succeed
        assert!(receiver.recv().is_ok());

        // Second recv should fail (channel closed)
        assert!(receiver.recv().is_err());
    }
}
