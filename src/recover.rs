use crate::error::ExtractError;
use log::debug;
use regex::Regex;
use serde::Deserialize;

/// Model output in the shape the prompt demands. All three keys are
/// required; a response missing any of them counts as a parse failure and
/// goes through recovery instead of being silently defaulted.
#[derive(Debug, Deserialize)]
struct StrictRecipe {
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
}

/// Structured data recovered from model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl From<StrictRecipe> for RecoveredRecipe {
    fn from(r: StrictRecipe) -> Self {
        RecoveredRecipe {
            title: r.title,
            ingredients: r.ingredients,
            instructions: r.instructions,
        }
    }
}

/// Recovers a structured recipe from model output that may be strict JSON,
/// JSON buried in prose, or free text.
///
/// Parse order per call: strict JSON first, then embedded `{...}` blocks
/// with trailing-comma repair, then the free-text pattern tables. Each
/// field inside the free-text pass is first-match-wins over its ordered
/// pattern list.
pub struct RecoveryParser {
    json_block: Regex,
    trailing_comma_obj: Regex,
    trailing_comma_arr: Regex,
    title_patterns: Vec<Regex>,
    ingredient_sections: Vec<Regex>,
    instruction_sections: Vec<Regex>,
    list_item: Regex,
}

impl RecoveryParser {
    pub fn new() -> Self {
        RecoveryParser {
            json_block: Regex::new(r"\{[\s\S]*?\}").unwrap(),
            trailing_comma_obj: Regex::new(r",\s*\}").unwrap(),
            trailing_comma_arr: Regex::new(r",\s*\]").unwrap(),
            title_patterns: vec![
                Regex::new(r"(?im)^(?:Recipe Name:|Title:|Recipe:)\s*([^\n]+)$").unwrap(),
                Regex::new(r"(?im)^\*\*(?:Recipe Name:|Title:|Recipe:)\*\*\s*([^\n]+)$").unwrap(),
                Regex::new(r"(?m)^#\s+([^\n]+)$").unwrap(),
            ],
            // Section headers are anchored with (?:^|\n) rather than (?m)^ so
            // that the end-of-text $ inside the terminator alternation keeps
            // meaning end of text, not end of line.
            ingredient_sections: vec![
                Regex::new(r"(?is)(?:^|\n)Ingredients:(.+?)(?:Instructions:|Directions:|Notes:|$)")
                    .unwrap(),
                Regex::new(
                    r"(?is)(?:^|\n)\*\*Ingredients:\*\*(.+?)(?:\*\*(?:Instructions:|Directions:|Notes:)|$)",
                )
                .unwrap(),
                Regex::new(r"(?is)(?:^|\n)##\s*Ingredients(.+?)(?:##|$)").unwrap(),
            ],
            instruction_sections: vec![
                Regex::new(
                    r"(?is)(?:^|\n)(?:Instructions:|Directions:|Method:|Preparation:)(.+?)(?:Notes:|To Serve:|$)",
                )
                .unwrap(),
                Regex::new(
                    r"(?is)(?:^|\n)\*\*(?:Instructions:|Directions:|Method:|Preparation:)\*\*(.+?)(?:\*\*(?:Notes:|To Serve:)|$)",
                )
                .unwrap(),
                Regex::new(
                    r"(?is)(?:^|\n)##\s*(?:Instructions|Directions|Method|Preparation)(.+?)(?:##|$)",
                )
                .unwrap(),
            ],
            list_item: Regex::new(r"(?:^|\n)(?:\d+\.|\*|-)\s*([^\n]+)").unwrap(),
        }
    }

    /// Run the full recovery state machine over raw model output.
    pub fn parse(&self, raw: &str) -> Result<RecoveredRecipe, ExtractError> {
        if let Ok(strict) = serde_json::from_str::<StrictRecipe>(raw.trim()) {
            return Ok(strict.into());
        }

        if let Some(recovered) = self.parse_embedded_json(raw) {
            debug!("recovered recipe from embedded JSON block");
            return Ok(recovered);
        }

        debug!("model output is not JSON, trying free-text patterns");
        let recovered = self.parse_free_text(raw);
        if recovered.title.is_empty()
            && recovered.ingredients.is_empty()
            && recovered.instructions.is_empty()
        {
            return Err(ExtractError::MalformedOutput);
        }
        Ok(recovered)
    }

    /// Scan for `{...}` blocks in the text, repair trailing commas, and retry
    /// JSON parsing on each candidate before giving up on the JSON path.
    fn parse_embedded_json(&self, raw: &str) -> Option<RecoveredRecipe> {
        for block in self.json_block.find_iter(raw) {
            let flattened = block.as_str().replace('\n', " ");
            let repaired = self.trailing_comma_obj.replace_all(&flattened, "}");
            let repaired = self.trailing_comma_arr.replace_all(&repaired, "]");
            if let Ok(strict) = serde_json::from_str::<StrictRecipe>(&repaired) {
                return Some(strict.into());
            }
        }
        None
    }

    /// Pattern-based section detection over free-form text.
    pub fn parse_free_text(&self, text: &str) -> RecoveredRecipe {
        RecoveredRecipe {
            title: self.extract_title(text),
            ingredients: self.extract_section(text, &self.ingredient_sections),
            instructions: self.extract_section(text, &self.instruction_sections),
        }
    }

    fn extract_title(&self, text: &str) -> String {
        for pattern in &self.title_patterns {
            if let Some(caps) = pattern.captures(text) {
                let title = caps[1].trim();
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }
        // Fall back to the first non-empty line
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    fn extract_section(&self, text: &str, patterns: &[Regex]) -> Vec<String> {
        let section = patterns
            .iter()
            .find_map(|p| p.captures(text))
            .map(|caps| caps[1].trim().to_string());

        let Some(section) = section else {
            return Vec::new();
        };

        let items: Vec<String> = self
            .list_item
            .captures_iter(&section)
            .map(|caps| caps[1].trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        if !items.is_empty() {
            return items;
        }

        // No numbered/bulleted lines: treat each non-empty line as one item
        section
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for RecoveryParser {
    fn default() -> Self {
        RecoveryParser::new()
    }
}
