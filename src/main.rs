//! Nutriscan
//!
//! Command-line tool that rates the healthiness of packaged food from a
//! photo of its label. The pipeline runs OCR text extraction, heuristic
//! label parsing, ingredient risk classification against an optional
//! reference dataset, and aggregates everything into a 0-100 health score
//! with qualitative explanations.

mod analysis;
mod label;
mod ocr;
mod paths;
mod scan;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;

use analysis::dataset::{IngredientLookup, RiskDataset};
use scan::config::{get_config, init_config};
use scan::queue::{create_scan_queue, ScanJob};
use scan::record::{new_scan_id, ScanRecord, ScanStatus};

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("nutriscan.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Parser)]
#[command(
    name = "nutriscan",
    version,
    about = "Analyze food label photos for ingredient risks and a health score"
)]
struct Cli {
    /// Label image files to analyze
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Ingredient risk dataset (JSON array); overrides the config entry
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Directory for scan records (defaults to <exe_dir>/results)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the completed scan record as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_directories()?;
    init_config();
    let config = get_config();

    // Missing language data only matters once a scan actually runs, and
    // Tesseract may still find its own bundled data.
    if let Err(e) = ocr::ensure_tessdata(&config.ocr.lang) {
        log(&format!("Warning: tessdata setup failed: {}", e));
        log("OCR may fail if no system language data is installed.");
    }

    let dataset = load_dataset(&cli)?;
    let results_dir = cli.out.clone().unwrap_or_else(paths::get_results_dir);
    std::fs::create_dir_all(&results_dir).context("Failed to create results directory")?;

    if cli.images.len() == 1 {
        run_single(&cli, dataset.as_deref(), &results_dir)
    } else {
        run_batch(&cli, dataset, &results_dir)
    }
}

/// Loads the ingredient risk dataset named on the command line or in
/// config.json. Without one, classification falls back to the built-in
/// keyword heuristics.
fn load_dataset(cli: &Cli) -> Result<Option<Arc<RiskDataset>>> {
    let path = cli
        .dataset
        .clone()
        .or_else(|| get_config().dataset_path.clone());

    match path {
        Some(path) => {
            let dataset = RiskDataset::from_json_file(&path).with_context(|| {
                format!("Failed to load ingredient dataset from {}", path.display())
            })?;
            log(&format!("Loaded {} ingredient risk entries", dataset.len()));
            Ok(Some(Arc::new(dataset)))
        }
        None => {
            log("No ingredient dataset configured; using built-in keyword heuristics only");
            Ok(None)
        }
    }
}

/// Processes a single image inline and prints a summary.
fn run_single(cli: &Cli, dataset: Option<&RiskDataset>, results_dir: &Path) -> Result<()> {
    let config = get_config();
    let image = &cli.images[0];

    log(&format!("Scanning {}", image.display()));

    let mut record = ScanRecord::new(new_scan_id(1), image.clone());
    let lookup = dataset.map(|d| d as &dyn IngredientLookup);
    scan::process_scan(&mut record, lookup, config);

    let record_path = scan::store::write_record(results_dir, &record)?;
    scan::store::append_index(&results_dir.join("scans.csv"), &record)?;
    log(&format!("Scan record saved: {}", record_path.display()));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    match record.status {
        ScanStatus::Completed => {
            print_summary(&record);
            Ok(())
        }
        _ => bail!(
            "scan failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Processes several images through the work queue and a dedicated scan
/// worker thread.
fn run_batch(cli: &Cli, dataset: Option<Arc<RiskDataset>>, results_dir: &Path) -> Result<()> {
    let config = get_config().clone();
    let (sender, receiver) = create_scan_queue();

    let worker_dir = results_dir.to_path_buf();
    let handle = thread::spawn(move || {
        scan::worker::run_scan_worker(receiver, worker_dir, dataset, config);
    });

    for (i, image) in cli.images.iter().enumerate() {
        let job = ScanJob::new(new_scan_id(i as u32 + 1), image.clone());
        sender.send(job).context("Scan queue closed unexpectedly")?;
    }

    // Closing the queue lets the worker drain and exit.
    drop(sender);
    handle.join().map_err(|_| anyhow!("scan worker panicked"))?;

    log(&format!(
        "Batch complete: {} images, records in {}",
        cli.images.len(),
        results_dir.display()
    ));
    Ok(())
}

/// Prints the human-readable result of a completed scan.
fn print_summary(record: &ScanRecord) {
    let Some(analysis) = &record.analysis else {
        return;
    };

    log(&format!(
        "Product: {}",
        record.product_name.as_deref().unwrap_or("(unknown)")
    ));
    log(&format!(
        "Health score: {}/100 ({})",
        analysis.overall_score,
        analysis.rating.as_str()
    ));
    for positive in &analysis.positives {
        log(&format!("  + {}", positive));
    }
    for concern in &analysis.concerns {
        log(&format!("  - {}", concern));
    }
    for recommendation in &analysis.recommendations {
        log(&format!("  > {}", recommendation));
    }
}
