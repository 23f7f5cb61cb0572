//! Ingredient risk analysis and health scoring.
//!
//! This module provides:
//! - The reference risk dataset lookup abstraction
//! - Per-ingredient classification (dataset match first, keyword fallback)
//! - Aggregation of classifications and nutrition facts into the final
//!   analysis result

pub mod classify;
pub mod dataset;
pub mod score;

pub use classify::{classify_ingredient, IngredientAssessment, IngredientStatus};
pub use dataset::{IngredientLookup, RiskDataset, RiskLevel, RiskRecord};
pub use score::{score_label, AnalysisResult, NutritionThresholds, Rating};

use crate::label::ParsedLabel;

/// Analyzes parsed label data: classifies every ingredient in label order
/// and folds the results into an overall analysis.
pub fn analyze_label_data(
    data: &ParsedLabel,
    lookup: Option<&dyn IngredientLookup>,
    thresholds: &NutritionThresholds,
) -> AnalysisResult {
    let assessments = data
        .ingredients
        .iter()
        .map(|ingredient| classify_ingredient(ingredient, lookup))
        .collect();

    score_label(assessments, &data.nutrition_facts, thresholds)
}
