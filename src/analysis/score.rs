//! Health score aggregation.
//!
//! Folds per-ingredient classifications and nutrition-fact thresholds into
//! a 0-100 score, a discrete rating bucket, and lists of positives,
//! concerns, and recommendations. Pure and deterministic; nutrition
//! warnings are reported alongside the score but never feed back into it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::classify::{IngredientAssessment, IngredientStatus};

/// Score adjustments per ingredient status, applied to a neutral base of
/// 50 before clamping to [0, 100]. Unknown ingredients contribute nothing.
const BASE_SCORE: i32 = 50;
const GOOD_BONUS: i32 = 10;
const BAD_PENALTY: i32 = 15;
const MODERATE_PENALTY: i32 = 5;

/// Per-serving nutrition limits above which a warning is raised.
///
/// The defaults are product constants, not derived from any regulatory
/// guideline; they can be overridden in config.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionThresholds {
    /// Grams of sugar per serving.
    #[serde(default = "default_sugar_limit")]
    pub sugar_limit_g: f64,
    /// Milligrams of sodium per serving.
    #[serde(default = "default_sodium_limit")]
    pub sodium_limit_mg: f64,
}

fn default_sugar_limit() -> f64 {
    10.0
}

fn default_sodium_limit() -> f64 {
    500.0
}

impl Default for NutritionThresholds {
    fn default() -> Self {
        Self {
            sugar_limit_g: default_sugar_limit(),
            sodium_limit_mg: default_sodium_limit(),
        }
    }
}

/// Discrete rating bucket derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
            Rating::VeryPoor => "very_poor",
        }
    }

    /// Buckets a final score. Thresholds are inclusive at the lower bound
    /// of each bucket.
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            Rating::Excellent
        } else if score >= 65 {
            Rating::Good
        } else if score >= 50 {
            Rating::Fair
        } else if score >= 35 {
            Rating::Poor
        } else {
            Rating::VeryPoor
        }
    }
}

/// Raw nutrition strings passed through for display, plus threshold
/// warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
    pub warnings: Vec<String>,
}

/// Terminal output of one label analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: i32,
    pub rating: Rating,
    pub ingredients: Vec<IngredientAssessment>,
    pub positives: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub nutrition_analysis: NutritionAnalysis,
}

/// Aggregates per-ingredient assessments and nutrition facts into the
/// final analysis result.
///
/// Positives and concerns preserve the input ingredient order; nutrition
/// concerns follow the ingredient ones.
pub fn score_label(
    assessments: Vec<IngredientAssessment>,
    nutrition_facts: &HashMap<String, String>,
    thresholds: &NutritionThresholds,
) -> AnalysisResult {
    let mut positives = Vec::new();
    let mut concerns = Vec::new();
    let mut recommendations = Vec::new();

    for assessment in &assessments {
        match assessment.status {
            IngredientStatus::Good => positives.push(match &assessment.matched_name {
                Some(name) => format!("Contains {}", name),
                None => assessment.impact.clone(),
            }),
            IngredientStatus::Bad => {
                concerns.push(match (&assessment.matched_name, assessment.risk_level) {
                    (Some(name), Some(risk)) => {
                        format!("Contains {} ({} risk)", name, risk.as_str())
                    }
                    _ => assessment.impact.clone(),
                })
            }
            _ => {}
        }
    }

    let mut nutrition_warnings = Vec::new();

    let sugar = nutrition_facts
        .get("Sugar")
        .or_else(|| nutrition_facts.get("Total Sugars"));
    if let Some(value) = sugar.and_then(|raw| parse_leading_number(raw)) {
        if value > thresholds.sugar_limit_g {
            nutrition_warnings.push("High sugar content".to_string());
            concerns.push(format!(
                "High sugar content ({}g per serving)",
                format_number(value)
            ));
        }
    }

    if let Some(value) = nutrition_facts
        .get("Sodium")
        .and_then(|raw| parse_leading_number(raw))
    {
        if value > thresholds.sodium_limit_mg {
            nutrition_warnings.push("High sodium content".to_string());
            concerns.push(format!(
                "High sodium content ({}mg per serving)",
                format_number(value)
            ));
        }
    }

    let good_count = count_status(&assessments, IngredientStatus::Good);
    let bad_count = count_status(&assessments, IngredientStatus::Bad);
    let moderate_count = count_status(&assessments, IngredientStatus::Moderate);

    let score = BASE_SCORE + GOOD_BONUS * good_count
        - BAD_PENALTY * bad_count
        - MODERATE_PENALTY * moderate_count;
    let score = score.clamp(0, 100);

    if bad_count > 0 {
        recommendations.push("Look for alternatives without harmful additives".to_string());
    }
    if !nutrition_warnings.is_empty() {
        recommendations.push("Consider products with lower sugar and sodium".to_string());
    }
    if score < 50 {
        recommendations.push("This product may not be the healthiest choice".to_string());
    } else if score >= 70 {
        recommendations.push("This product appears to be a healthier option".to_string());
    }

    let nutrition_analysis = NutritionAnalysis {
        calories: nutrition_facts.get("Calories").cloned(),
        sugar: sugar.cloned(),
        sodium: nutrition_facts.get("Sodium").cloned(),
        fat: nutrition_facts.get("Total Fat").cloned(),
        warnings: nutrition_warnings,
    };

    AnalysisResult {
        overall_score: score,
        rating: Rating::from_score(score),
        ingredients: assessments,
        positives,
        concerns,
        recommendations,
        nutrition_analysis,
    }
}

fn count_status(assessments: &[IngredientAssessment], status: IngredientStatus) -> i32 {
    assessments
        .iter()
        .filter(|assessment| assessment.status == status)
        .count() as i32
}

/// Parses the leading numeric portion of a raw fact value, e.g.
/// "600mg" -> 600.0.
fn parse_leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Formats a parsed value without a trailing ".0" for whole numbers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify::classify_ingredient;

    fn assess(ingredients: &[&str]) -> Vec<IngredientAssessment> {
        ingredients
            .iter()
            .map(|raw| classify_ingredient(raw, None))
            .collect()
    }

    fn facts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_score_is_always_clamped() {
        // 10 harmful ingredients would push the raw score to -100
        let bad = vec!["aspartame"; 10];
        let result = score_label(assess(&bad), &HashMap::new(), &NutritionThresholds::default());
        assert_eq!(result.overall_score, 0);
        assert_eq!(result.rating, Rating::VeryPoor);

        // 10 beneficial ingredients would push it to 150
        let good = vec!["whole grain wheat"; 10];
        let result = score_label(assess(&good), &HashMap::new(), &NutritionThresholds::default());
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.rating, Rating::Excellent);
    }

    #[test]
    fn test_rating_bucket_boundaries() {
        assert_eq!(Rating::from_score(80), Rating::Excellent);
        assert_eq!(Rating::from_score(79), Rating::Good);
        assert_eq!(Rating::from_score(65), Rating::Good);
        assert_eq!(Rating::from_score(64), Rating::Fair);
        assert_eq!(Rating::from_score(50), Rating::Fair);
        assert_eq!(Rating::from_score(49), Rating::Poor);
        assert_eq!(Rating::from_score(35), Rating::Poor);
        assert_eq!(Rating::from_score(34), Rating::VeryPoor);
    }

    #[test]
    fn test_unknown_ingredients_leave_score_neutral() {
        let result = score_label(
            assess(&["cocoa", "carnauba wax"]),
            &HashMap::new(),
            &NutritionThresholds::default(),
        );
        assert_eq!(result.overall_score, 50);
        assert_eq!(result.rating, Rating::Fair);
    }

    #[test]
    fn test_sugar_over_threshold_warns_without_scoring() {
        let result = score_label(
            Vec::new(),
            &facts(&[("Sugar", "12g")]),
            &NutritionThresholds::default(),
        );

        // The warning is reported independently of the numeric score
        assert_eq!(result.overall_score, 50);
        assert_eq!(result.concerns, vec!["High sugar content (12g per serving)"]);
        assert_eq!(result.nutrition_analysis.warnings, vec!["High sugar content"]);
        assert_eq!(
            result.recommendations,
            vec!["Consider products with lower sugar and sodium"]
        );
    }

    #[test]
    fn test_sugar_falls_back_to_total_sugars_key() {
        let result = score_label(
            Vec::new(),
            &facts(&[("Total Sugars", "15.5g")]),
            &NutritionThresholds::default(),
        );
        assert_eq!(
            result.concerns,
            vec!["High sugar content (15.5g per serving)"]
        );
        assert_eq!(result.nutrition_analysis.sugar.as_deref(), Some("15.5g"));
    }

    #[test]
    fn test_sugar_at_threshold_is_not_flagged() {
        let result = score_label(
            Vec::new(),
            &facts(&[("Sugar", "10g")]),
            &NutritionThresholds::default(),
        );
        assert!(result.concerns.is_empty());
        assert!(result.nutrition_analysis.warnings.is_empty());
    }

    #[test]
    fn test_sodium_over_threshold_warns() {
        let result = score_label(
            Vec::new(),
            &facts(&[("Sodium", "600mg")]),
            &NutritionThresholds::default(),
        );
        assert_eq!(
            result.concerns,
            vec!["High sodium content (600mg per serving)"]
        );
    }

    #[test]
    fn test_unparseable_fact_value_is_ignored() {
        let result = score_label(
            Vec::new(),
            &facts(&[("Sugar", "lots"), ("Sodium", "mg600")]),
            &NutritionThresholds::default(),
        );
        assert!(result.concerns.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = NutritionThresholds {
            sugar_limit_g: 5.0,
            sodium_limit_mg: 100.0,
        };
        let result = score_label(
            Vec::new(),
            &facts(&[("Sugar", "6g"), ("Sodium", "150mg")]),
            &thresholds,
        );
        assert_eq!(result.concerns.len(), 2);
    }

    #[test]
    fn test_positives_and_concerns_preserve_ingredient_order() {
        let result = score_label(
            assess(&["oats", "aspartame", "quinoa", "bht"]),
            &HashMap::new(),
            &NutritionThresholds::default(),
        );
        assert_eq!(
            result.positives,
            vec![
                "oats is a nutritious ingredient",
                "quinoa is a nutritious ingredient"
            ]
        );
        assert_eq!(
            result.concerns,
            vec![
                "aspartame is linked to potential health concerns",
                "bht is linked to potential health concerns"
            ]
        );
    }

    #[test]
    fn test_recommendation_branches() {
        // Bad ingredient: alternatives advice plus the low-score advice
        let result = score_label(
            assess(&["aspartame"]),
            &HashMap::new(),
            &NutritionThresholds::default(),
        );
        assert_eq!(result.overall_score, 35);
        assert_eq!(
            result.recommendations,
            vec![
                "Look for alternatives without harmful additives",
                "This product may not be the healthiest choice"
            ]
        );

        // High score: healthier-option advice only
        let result = score_label(
            assess(&["oats", "quinoa"]),
            &HashMap::new(),
            &NutritionThresholds::default(),
        );
        assert_eq!(result.overall_score, 70);
        assert_eq!(
            result.recommendations,
            vec!["This product appears to be a healthier option"]
        );

        // Mid score with no findings: no recommendations at all
        let result = score_label(
            assess(&["cocoa"]),
            &HashMap::new(),
            &NutritionThresholds::default(),
        );
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_nutrition_passthrough() {
        let result = score_label(
            Vec::new(),
            &facts(&[
                ("Calories", "200"),
                ("Sugar", "4g"),
                ("Sodium", "120mg"),
                ("Total Fat", "7g"),
            ]),
            &NutritionThresholds::default(),
        );
        let nutrition = &result.nutrition_analysis;
        assert_eq!(nutrition.calories.as_deref(), Some("200"));
        assert_eq!(nutrition.sugar.as_deref(), Some("4g"));
        assert_eq!(nutrition.sodium.as_deref(), Some("120mg"));
        assert_eq!(nutrition.fat.as_deref(), Some("7g"));
        assert!(nutrition.warnings.is_empty());
    }

    #[test]
    fn test_rating_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Rating::VeryPoor).unwrap(),
            "\"very_poor\""
        );
        assert_eq!(serde_json::to_string(&Rating::Good).unwrap(), "\"good\"");
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("600mg"), Some(600.0));
        assert_eq!(parse_leading_number("12.5g"), Some(12.5));
        assert_eq!(parse_leading_number(" 200 "), Some(200.0));
        assert_eq!(parse_leading_number("mg600"), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
