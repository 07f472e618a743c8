use serde::{Deserialize, Serialize};

/// A recipe as produced by one pass of the extraction pipeline.
///
/// Transient: it lives for the duration of a single extraction request and
/// is only persisted when the caller explicitly saves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ExtractedRecipe {
    pub fn new(title: String, ingredients: Vec<String>, instructions: Vec<String>) -> Self {
        ExtractedRecipe {
            title,
            ingredients,
            instructions,
            original_url: None,
            image_url: None,
        }
    }

    /// True when no field carries any content. The pipeline never returns
    /// such a recipe; it reports `MalformedOutput` instead.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.ingredients.is_empty() && self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let recipe = ExtractedRecipe::new("Toast".into(), vec!["bread".into()], vec!["toast it".into()]);
        let json = serde_json::to_string(&recipe).unwrap();
        assert!(!json.contains("original_url"));
        assert!(!json.contains("image_url"));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let recipe: ExtractedRecipe = serde_json::from_str(
            r#"{"title":"Toast","ingredients":["bread"],"instructions":["toast it"]}"#,
        )
        .unwrap();
        assert_eq!(recipe.title, "Toast");
        assert!(recipe.original_url.is_none());
    }
}
