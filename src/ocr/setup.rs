//! Locates the Tesseract executable and language data.
//!
//! The executable is expected to be installed system-wide (PATH or a
//! common install location). Language data is resolved from the local
//! cache, TESSDATA_PREFIX, or system paths, and downloaded into the cache
//! when missing entirely.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Returns the local cache directory for downloaded language data.
pub fn get_tessdata_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nutriscan")
        .join("tessdata")
}

/// Finds the Tesseract executable, checking PATH first, then common
/// install locations.
pub fn find_tesseract_executable() -> Option<PathBuf> {
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Some(PathBuf::from("tesseract"));
        }
    }

    let common_paths = [
        "/usr/bin/tesseract",
        "/usr/local/bin/tesseract",
        "/opt/homebrew/bin/tesseract",
        r"C:\Program Files\Tesseract-OCR\tesseract.exe",
        r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    ];

    common_paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Finds a tessdata directory containing trained data for `lang`.
///
/// Checks the local cache, TESSDATA_PREFIX, then system install paths.
/// Returns None when none of them has `<lang>.traineddata`; Tesseract may
/// still find its own bundled data in that case.
pub fn find_tessdata_dir(lang: &str) -> Option<PathBuf> {
    let traineddata = format!("{}.traineddata", lang);

    let cache = get_tessdata_cache_dir();
    if cache.join(&traineddata).exists() {
        return Some(cache);
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if p.join(&traineddata).exists() {
            return Some(p);
        }
        let p = p.join("tessdata");
        if p.join(&traineddata).exists() {
            return Some(p);
        }
    }

    let system_paths = [
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4.00/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        "/opt/homebrew/share/tessdata",
        r"C:\Program Files\Tesseract-OCR\tessdata",
    ];

    system_paths
        .iter()
        .map(PathBuf::from)
        .find(|p| p.join(&traineddata).exists())
}

/// Ensures trained data for `lang` is available, downloading it into the
/// local cache when no existing installation provides it.
pub fn ensure_tessdata(lang: &str) -> Result<PathBuf> {
    if let Some(dir) = find_tessdata_dir(lang) {
        return Ok(dir);
    }

    let cache = get_tessdata_cache_dir();
    fs::create_dir_all(&cache).context("Failed to create tessdata cache directory")?;
    download_traineddata(lang, &cache)?;
    Ok(cache)
}

/// Downloads `<lang>.traineddata` from the official tessdata repository.
fn download_traineddata(lang: &str, tessdata_dir: &Path) -> Result<()> {
    let url = format!("{}/{}.traineddata", TESSDATA_REPO, lang);
    let target = tessdata_dir.join(format!("{}.traineddata", lang));

    crate::log(&format!("Downloading {}.traineddata...", lang));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client.get(&url).header("User-Agent", "nutriscan").send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}.traineddata: HTTP {}",
            lang,
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(&target)?;
    file.write_all(&bytes)?;

    crate::log(&format!(
        "Downloaded {}.traineddata ({} bytes)",
        lang,
        bytes.len()
    ));

    Ok(())
}
