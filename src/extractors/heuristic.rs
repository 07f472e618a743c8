use crate::error::ExtractError;
use crate::model::ExtractedRecipe;
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Generic DOM-pattern extractor for sites without a registered scraper.
///
/// Tries ordered candidate selectors per field and takes the first
/// non-empty match. A result is returned only when a title was found and
/// at least one of ingredients/instructions is non-empty; anything less is
/// `NoRecipeFound` and the pipeline moves on to the model fallback.
pub struct HeuristicExtractor;

const TITLE_CANDIDATES: [&str; 5] = [
    "h1[class*='recipe']",
    "h1[class*='title']",
    "h1",
    "meta[property='og:title']",
    "meta[name='title']",
];

const INGREDIENT_CANDIDATES: [&str; 3] = [
    "ul[class*='ingredient'] li",
    "div[class*='ingredient'] li",
    "li[class*='ingredient']",
];

const INSTRUCTION_CANDIDATES: [&str; 4] = [
    "ol[class*='instruction'] li",
    "div[class*='instruction'] li",
    "li[class*='instruction']",
    "li[class*='step']",
];

impl HeuristicExtractor {
    pub fn extract(document: &Html) -> Result<ExtractedRecipe, ExtractError> {
        let title = find_title(document).unwrap_or_default();
        let ingredients = find_list_items(document, &INGREDIENT_CANDIDATES);
        let instructions = find_list_items(document, &INSTRUCTION_CANDIDATES);

        if title.is_empty() || (ingredients.is_empty() && instructions.is_empty()) {
            debug!("DOM heuristics found no usable recipe structure");
            return Err(ExtractError::NoRecipeFound);
        }

        debug!(
            "DOM heuristics extracted '{}' ({} ingredients, {} steps)",
            title,
            ingredients.len(),
            instructions.len()
        );

        Ok(ExtractedRecipe::new(title, ingredients, instructions))
    }
}

fn find_title(document: &Html) -> Option<String> {
    for candidate in TITLE_CANDIDATES {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in document.select(&selector) {
            // Meta candidates carry the title in their content attribute
            let text = match element.value().attr("content") {
                Some(content) => content.trim().to_string(),
                None => collapse_text(&element),
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn find_list_items(document: &Html, candidates: &[&str]) -> Vec<String> {
    for candidate in candidates {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        let items: Vec<String> = document
            .select(&selector)
            .map(|el| collapse_text(&el))
            .filter(|text| !text.is_empty())
            .collect();
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

fn collapse_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
