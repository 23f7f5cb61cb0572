//! OCR text extraction for label photos.
//!
//! Wraps the Tesseract CLI: locating the executable and language data,
//! running recognition on an image, and estimating a confidence band for
//! the output. This is the only pipeline stage that can fail.

pub mod engine;
pub mod setup;

pub use engine::{extract_text, extract_text_from_bytes, ExtractedText, ExtractionError};
pub use setup::ensure_tessdata;
