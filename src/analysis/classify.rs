//! Per-ingredient risk classification.
//!
//! Resolves a normalized ingredient against the reference dataset first,
//! then falls back to built-in keyword lists. Never fails: ingredients
//! with no match anywhere degrade to `unknown`.

use serde::{Deserialize, Serialize};

use super::dataset::{IngredientLookup, RiskLevel};
use crate::label::normalize_ingredient;

/// Keywords marking ingredients as harmful when no dataset entry matches.
/// Checked before the other lists; first match wins.
const HARMFUL_KEYWORDS: &[&str] = &[
    "high fructose corn syrup",
    "partially hydrogenated",
    "trans fat",
    "artificial color",
    "artificial flavor",
    "msg",
    "monosodium glutamate",
    "sodium nitrite",
    "sodium benzoate",
    "potassium benzoate",
    "bha",
    "bht",
    "tbhq",
    "aspartame",
    "acesulfame",
];

const BENEFICIAL_KEYWORDS: &[&str] = &[
    "whole grain",
    "whole wheat",
    "oats",
    "quinoa",
    "brown rice",
    "flaxseed",
    "chia",
    "vitamin",
    "mineral",
    "fiber",
    "protein",
    "omega",
];

const MODERATE_KEYWORDS: &[&str] = &["sugar", "salt", "sodium", "oil", "syrup"];

/// Health status bucket for a single ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientStatus {
    Good,
    Moderate,
    Bad,
    Unknown,
}

/// Assessment of a single parsed ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAssessment {
    /// Raw ingredient text as it appeared on the label.
    pub name: String,
    pub status: IngredientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human-readable impact sentence.
    pub impact: String,
    /// Canonical dataset name when the ingredient matched an entry; lets
    /// the scorer phrase positives/concerns with the dataset's spelling.
    #[serde(skip)]
    pub matched_name: Option<String>,
}

/// Classifies one raw ingredient token.
///
/// A dataset match takes precedence; otherwise the keyword lists decide,
/// harmful first, then beneficial, then moderate.
pub fn classify_ingredient(
    raw: &str,
    lookup: Option<&dyn IngredientLookup>,
) -> IngredientAssessment {
    let normalized = normalize_ingredient(raw);

    if let Some(record) = lookup.and_then(|lookup| lookup.find(&normalized)) {
        let status = match record.risk_level {
            RiskLevel::Low => IngredientStatus::Good,
            RiskLevel::Moderate => IngredientStatus::Moderate,
            RiskLevel::High => IngredientStatus::Bad,
        };
        return IngredientAssessment {
            name: raw.to_string(),
            status,
            risk_level: Some(record.risk_level),
            description: record.description.clone(),
            impact: impact_message(record.risk_level, &record.name),
            matched_name: Some(record.name.clone()),
        };
    }

    classify_by_keyword(raw)
}

/// Templated impact sentence for dataset-backed classifications.
fn impact_message(risk_level: RiskLevel, name: &str) -> String {
    match risk_level {
        RiskLevel::Low => format!("{} is generally safe for consumption", name),
        RiskLevel::Moderate => format!("{} should be consumed in moderation", name),
        RiskLevel::High => format!("{} may have negative health impacts", name),
    }
}

/// Fallback classification against the built-in keyword lists.
fn classify_by_keyword(raw: &str) -> IngredientAssessment {
    let lower = raw.to_lowercase();

    if HARMFUL_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return IngredientAssessment {
            name: raw.to_string(),
            status: IngredientStatus::Bad,
            risk_level: Some(RiskLevel::High),
            description: None,
            impact: format!("{} is linked to potential health concerns", raw),
            matched_name: None,
        };
    }

    if BENEFICIAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return IngredientAssessment {
            name: raw.to_string(),
            status: IngredientStatus::Good,
            risk_level: Some(RiskLevel::Low),
            description: None,
            impact: format!("{} is a nutritious ingredient", raw),
            matched_name: None,
        };
    }

    if MODERATE_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return IngredientAssessment {
            name: raw.to_string(),
            status: IngredientStatus::Moderate,
            risk_level: Some(RiskLevel::Moderate),
            description: None,
            impact: format!("{} should be consumed in moderation", raw),
            matched_name: None,
        };
    }

    IngredientAssessment {
        name: raw.to_string(),
        status: IngredientStatus::Unknown,
        risk_level: None,
        description: None,
        impact: format!("{} - no specific health concerns identified", raw),
        matched_name: None,
    }
}
