//! Persistence for scan records.
//!
//! Each scan is written as a pretty-printed JSON file named by scan id,
//! plus one row in an append-only index CSV for quick listing.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::record::ScanRecord;

/// Index CSV header row.
const INDEX_HEADER: &str = "id,created_at,status,image,score,rating";

/// Writes one scan record as `<id>.json` in the results directory.
pub fn write_record(results_dir: &Path, record: &ScanRecord) -> Result<PathBuf> {
    let path = results_dir.join(format!("{}.json", record.id));

    let json = serde_json::to_string_pretty(record).context("Failed to serialize scan record")?;
    let mut file = File::create(&path)
        .context(format!("Failed to create record file: {}", path.display()))?;
    file.write_all(json.as_bytes())
        .context("Failed to write scan record")?;

    Ok(path)
}

/// Initializes the index CSV with a header if it doesn't exist or is
/// empty. An index with content is left untouched.
pub fn init_index(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing index CSV")?;
        let reader = BufReader::new(file);
        if reader.lines().next().is_some() {
            return Ok(());
        }
    }

    let mut file = File::create(path).context("Failed to create index CSV")?;
    writeln!(file, "{}", INDEX_HEADER).context("Failed to write index header")?;
    Ok(())
}

/// Appends one record row to the index CSV.
///
/// Opens the file in append mode for each write; if a batch dies partway
/// through, completed rows are already saved.
pub fn append_index(path: &Path, record: &ScanRecord) -> Result<()> {
    init_index(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open index CSV for append")?;

    let (score, rating) = match &record.analysis {
        Some(analysis) => (
            analysis.overall_score.to_string(),
            analysis.rating.as_str().to_string(),
        ),
        None => (String::new(), String::new()),
    };

    let line = format!(
        "{},{},{},{},{},{}",
        record.id,
        record.created_at.format("%Y-%m-%dT%H:%M:%S"),
        record.status.as_str(),
        record.image_path.display(),
        score,
        rating,
    );

    writeln!(file, "{}", line).context("Failed to write index row")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_label_data, NutritionThresholds};
    use crate::label::parse_label_text;
    use crate::ocr::ExtractedText;
    use tempfile::tempdir;

    fn completed_record(id: &str) -> ScanRecord {
        let mut record = ScanRecord::new(id.to_string(), PathBuf::from("labels/bar.png"));
        record.start();
        let text = "Choco Bar\nIngredients: Sugar, Palm Oil, Cocoa";
        let parsed = parse_label_text(text);
        let analysis = analyze_label_data(&parsed, None, &NutritionThresholds::default());
        record.complete(
            ExtractedText {
                text: text.to_string(),
                confidence: 70,
            },
            parsed,
            analysis,
        );
        record
    }

    #[test]
    fn test_write_record_creates_json_file() {
        let dir = tempdir().unwrap();
        let record = completed_record("scan-20250101-120000-001");

        let path = write_record(dir.path(), &record).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "scan-20250101-120000-001.json"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"status\": \"COMPLETED\""));
        assert!(content.contains("\"healthScore\": 40"));
        assert!(content.contains("\"rating\": \"poor\""));
    }

    #[test]
    fn test_write_failed_record() {
        let dir = tempdir().unwrap();
        let mut record = ScanRecord::new("scan-f".to_string(), PathBuf::from("bad.png"));
        record.start();
        record.fail("Tesseract failed: could not read image".to_string());

        let path = write_record(dir.path(), &record).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"status\": \"FAILED\""));
        assert!(content.contains("\"error\""));
        assert!(!content.contains("analysisResult"));
    }

    #[test]
    fn test_init_index_creates_header() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("scans.csv");

        init_index(&index_path).unwrap();

        let content = std::fs::read_to_string(&index_path).unwrap();
        assert!(content.starts_with(INDEX_HEADER));
    }

    #[test]
    fn test_init_index_preserves_existing() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("scans.csv");

        std::fs::write(&index_path, "existing,data\n1,2,3\n").unwrap();
        init_index(&index_path).unwrap();

        let content = std::fs::read_to_string(&index_path).unwrap();
        assert!(content.starts_with("existing,data"));
    }

    #[test]
    fn test_append_index_rows() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("scans.csv");

        for i in 1..=3 {
            let record = completed_record(&format!("scan-{}", i));
            append_index(&index_path, &record).unwrap();
        }

        let content = std::fs::read_to_string(&index_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 4); // header + 3 data rows
        assert!(lines[1].contains("scan-1"));
        assert!(lines[1].contains("COMPLETED"));
        assert!(lines[1].contains("40,poor"));
    }

    #[test]
    fn test_append_index_failed_record_has_empty_score() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("scans.csv");

        let mut record = ScanRecord::new("scan-f".to_string(), PathBuf::from("bad.png"));
        record.fail("engine unavailable".to_string());
        append_index(&index_path, &record).unwrap();

        let content = std::fs::read_to_string(&index_path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains("FAILED"));
        assert!(row.ends_with(",,"));
    }
}
