use regex::Regex;

/// Text normalizer for extracted ingredient and instruction lists.
///
/// The rewrite rules run in a fixed order per ingredient; later rules assume
/// the earlier ones already ran (unit normalization expects digit runs to be
/// separated from letters first).
pub struct Cleaner {
    bullet_glyphs: Regex,
    digit_letter: Regex,
    case_boundary: Regex,
    unit_abbrev: Regex,
    whitespace: Regex,
    nutrition_prefix: Regex,
}

impl Cleaner {
    pub fn new() -> Self {
        Cleaner {
            bullet_glyphs: Regex::new(r"[▢□■►•◆]").unwrap(),
            digit_letter: Regex::new(r"(\d)([A-Za-z])").unwrap(),
            case_boundary: Regex::new(r"([a-z])([A-Z])").unwrap(),
            unit_abbrev: Regex::new(r"(\d+)\s*(tbsp|tsp|cup|g|oz|ml|lb)\b").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            nutrition_prefix: Regex::new(r"(?i)^(kcal|fat|saturates|carbs|sugars|fibre|protein|salt)")
                .unwrap(),
        }
    }

    /// Apply the rewrite rules to one raw ingredient line.
    pub fn clean_ingredient(&self, raw: &str) -> String {
        let cleaned = self.bullet_glyphs.replace_all(raw, "");
        let cleaned = self.digit_letter.replace_all(&cleaned, "$1 $2");
        let cleaned = self.case_boundary.replace_all(&cleaned, "$1 $2");
        let cleaned = self.unit_abbrev.replace_all(&cleaned, "$1 $2");
        let cleaned = self.whitespace.replace_all(&cleaned, " ");
        cleaned.trim().to_string()
    }

    pub fn clean_ingredients(&self, raw: &[String]) -> Vec<String> {
        raw.iter().map(|item| self.clean_ingredient(item)).collect()
    }

    /// Drop instruction lines that duplicate an ingredient (case-insensitive,
    /// trimmed) or that are nutritional-table noise.
    pub fn filter_instructions(
        &self,
        instructions: Vec<String>,
        ingredients: &[String],
    ) -> Vec<String> {
        let lowered: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim().to_lowercase())
            .collect();

        instructions
            .into_iter()
            .filter(|step| {
                let trimmed = step.trim();
                if lowered.iter().any(|i| *i == trimmed.to_lowercase()) {
                    return false;
                }
                !self.nutrition_prefix.is_match(trimmed)
            })
            .collect()
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Cleaner::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> Cleaner {
        Cleaner::new()
    }

    #[test]
    fn inserts_space_between_digit_and_letter() {
        assert_eq!(cleaner().clean_ingredient("2cups flour"), "2 cups flour");
        assert_eq!(cleaner().clean_ingredient("500g butter"), "500 g butter");
    }

    #[test]
    fn splits_lowercase_uppercase_boundary() {
        assert_eq!(cleaner().clean_ingredient("1cupSugar"), "1 cup Sugar");
    }

    #[test]
    fn strips_decorative_bullets() {
        assert_eq!(cleaner().clean_ingredient("▢ 1 tsp salt"), "1 tsp salt");
        assert_eq!(cleaner().clean_ingredient("• 2 eggs"), "2 eggs");
    }

    #[test]
    fn normalizes_unit_abbreviations() {
        assert_eq!(cleaner().clean_ingredient("3tbsp olive oil"), "3 tbsp olive oil");
        assert_eq!(cleaner().clean_ingredient("250ml milk"), "250 ml milk");
        assert_eq!(cleaner().clean_ingredient("1lb beef"), "1 lb beef");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(cleaner().clean_ingredient("  1   cup\tflour  "), "1 cup flour");
    }

    #[test]
    fn already_clean_input_is_unchanged() {
        assert_eq!(cleaner().clean_ingredient("1 cup flour"), "1 cup flour");
    }

    #[test]
    fn filters_instructions_matching_ingredients() {
        let c = cleaner();
        let ingredients = vec!["1 cup flour".to_string(), "2 eggs".to_string()];
        let instructions = vec![
            "1 CUP FLOUR ".to_string(),
            "Mix the flour and eggs".to_string(),
            "2 eggs".to_string(),
        ];
        let filtered = c.filter_instructions(instructions, &ingredients);
        assert_eq!(filtered, vec!["Mix the flour and eggs".to_string()]);
    }

    #[test]
    fn filters_nutritional_noise() {
        let c = cleaner();
        let instructions = vec![
            "kcal 250".to_string(),
            "Fat 12g".to_string(),
            "saturates 3g".to_string(),
            "Protein 8g".to_string(),
            "Salt 0.4g".to_string(),
            "Bake for 20 minutes".to_string(),
            "Season with salt and pepper".to_string(),
        ];
        let filtered = c.filter_instructions(instructions, &[]);
        assert_eq!(
            filtered,
            vec![
                "Bake for 20 minutes".to_string(),
                "Season with salt and pepper".to_string(),
            ]
        );
    }

    #[test]
    fn no_filtered_instruction_equals_an_ingredient() {
        let c = cleaner();
        let ingredients: Vec<String> = vec!["1 onion".into(), "2 cloves garlic".into()];
        let instructions: Vec<String> =
            vec!["1 onion".into(), "2 Cloves Garlic".into(), "Chop everything".into()];
        let filtered = c.filter_instructions(instructions, &ingredients);
        for step in &filtered {
            assert!(!ingredients
                .iter()
                .any(|i| i.trim().to_lowercase() == step.trim().to_lowercase()));
        }
    }
}
