//! Reference ingredient risk dataset.
//!
//! An externally supplied, read-only lookup table mapping ingredient names
//! and slugs to risk records. Hidden behind a trait so classification is
//! testable without any backing store; the dataset may be shared across
//! concurrent scans without synchronization.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// LOW/MODERATE/HIGH health risk classification of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub name: String,
    pub slug: Option<String>,
    pub risk_level: RiskLevel,
    pub description: Option<String>,
}

/// Read-only lookup the classifier queries with a normalized ingredient
/// name.
pub trait IngredientLookup {
    /// Returns the first record whose name or slug contains `normalized`,
    /// case-insensitively. An empty key matches nothing.
    fn find(&self, normalized: &str) -> Option<&RiskRecord>;
}

/// In-memory dataset loaded from a JSON array of risk records.
#[derive(Debug, Clone, Default)]
pub struct RiskDataset {
    entries: Vec<RiskRecord>,
}

impl RiskDataset {
    pub fn new(entries: Vec<RiskRecord>) -> Self {
        Self { entries }
    }

    /// Loads a dataset from a JSON file containing an array of records.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read dataset file: {}", path.display()))?;
        let entries: Vec<RiskRecord> =
            serde_json::from_str(&contents).context("Failed to parse dataset JSON")?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IngredientLookup for RiskDataset {
    fn find(&self, normalized: &str) -> Option<&RiskRecord> {
        // An empty key would trivially match every entry.
        if normalized.is_empty() {
            return None;
        }

        self.entries.iter().find(|entry| {
            entry.name.to_lowercase().contains(normalized)
                || entry
                    .slug
                    .as_deref()
                    .is_some_and(|slug| slug.to_lowercase().contains(normalized))
        })
    }
}
