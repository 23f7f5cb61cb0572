use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches the "Ingredients:" section label, singular or plural.
static INGREDIENTS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ingredients?:").expect("valid regex"));

/// Matches the start of a new labeled section after the ingredient list.
static SECTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(nutrition|allergen|warning|serving|storage):").expect("valid regex")
});

/// Matches "label + numeric value (+ unit)" nutrition fact lines,
/// e.g. "Calories: 150" or "Sodium 600mg".
static NUTRITION_FACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z\s]+)[\s:]+(\d+\.?\d*\s*[a-z%]*)").expect("valid regex"));

/// Matches warning/allergen lines.
static WARNING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)contains?:|allergen|warning").expect("valid regex"));

/// How many lines after the "Ingredients:" line may continue the list.
const INGREDIENT_LOOKAHEAD_LINES: usize = 4;

/// Structured fields parsed from raw label text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLabel {
    /// First non-empty line of the label, if any.
    pub product_name: Option<String>,
    /// Raw ingredient tokens in label order; may contain duplicates.
    pub ingredients: Vec<String>,
    /// Nutrition fact lines as found, keyed by their free-form label.
    pub nutrition_facts: HashMap<String, String>,
    /// Lines mentioning allergens or warnings, in document order.
    pub warnings: Vec<String>,
}

/// Parses raw OCR text into structured label fields.
///
/// Total function: malformed or empty input yields empty fields, never an
/// error.
pub fn parse_label_text(text: &str) -> ParsedLabel {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    ParsedLabel {
        product_name: lines.first().map(|line| line.to_string()),
        ingredients: extract_ingredients(&lines),
        nutrition_facts: extract_nutrition_facts(&lines),
        warnings: extract_warnings(&lines),
    }
}

/// Collects the ingredient list from the "Ingredients:" line plus up to
/// four continuation lines, stopping early at a new labeled section or a
/// nutrition fact line.
fn extract_ingredients(lines: &[&str]) -> Vec<String> {
    let Some(idx) = lines.iter().position(|line| INGREDIENTS_LABEL.is_match(line)) else {
        return Vec::new();
    };

    let mut text = INGREDIENTS_LABEL
        .replacen(lines[idx], 1, "")
        .trim()
        .to_string();

    for line in lines.iter().skip(idx + 1).take(INGREDIENT_LOOKAHEAD_LINES) {
        if SECTION_START.is_match(line) || NUTRITION_FACT.is_match(line) {
            break;
        }
        text.push(' ');
        text.push_str(line);
    }

    text.split([',', ';', '(', ')'])
        .map(str::trim)
        .filter(|piece| piece.chars().count() > 2 && !piece.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Scans every line for nutrition facts, independently of where the
/// ingredients block sits. Later lines with the same key overwrite
/// earlier ones.
fn extract_nutrition_facts(lines: &[&str]) -> HashMap<String, String> {
    let mut facts = HashMap::new();
    for line in lines {
        if let Some(caps) = NUTRITION_FACT.captures(line) {
            facts.insert(caps[1].trim().to_string(), caps[2].trim().to_string());
        }
    }
    facts
}

fn extract_warnings(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| WARNING_LINE.is_match(line))
        .map(|line| line.to_string())
        .collect()
}
