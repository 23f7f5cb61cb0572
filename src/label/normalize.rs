/// Canonicalizes a raw ingredient token for dataset lookup.
///
/// Lower-cases, strips every character outside `[a-z0-9\s]`, and trims.
/// The result is only used as a lookup key, never shown to the user.
pub fn normalize_ingredient(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_ingredient("High-Fructose Corn Syrup!"), "highfructose corn syrup");
        assert_eq!(normalize_ingredient("Vitamin B12"), "vitamin b12");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize_ingredient("  Sugar  "), "sugar");
    }

    #[test]
    fn test_inner_whitespace_preserved() {
        assert_eq!(normalize_ingredient("Palm Oil"), "palm oil");
    }

    #[test]
    fn test_non_ascii_letters_stripped() {
        assert_eq!(normalize_ingredient("Açaí"), "aa");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["Sugar", "  E-621 (MSG)  ", "whole grain oats", "***", ""] {
            let once = normalize_ingredient(raw);
            assert_eq!(normalize_ingredient(&once), once);
        }
    }

    #[test]
    fn test_all_symbols_normalizes_to_empty() {
        assert_eq!(normalize_ingredient("***"), "");
    }
}
