/// System instruction constraining the model to JSON-only output.
pub const SYSTEM_PROMPT: &str = "You are a recipe extraction assistant. \
You ONLY respond with valid JSON following the specified format.";

/// Default cap on how much preprocessed page text goes into the prompt.
pub const DEFAULT_PROMPT_BUDGET: usize = 4000;

/// Build the user prompt: output schema, extraction constraints, then the
/// page text truncated to `budget` characters.
pub fn build_user_prompt(page_text: &str, budget: usize) -> String {
    format!(
        r#"Extract the recipe information from the content below.
YOU MUST RETURN ONLY VALID JSON in this exact format:
{{
  "title": "Recipe Title",
  "ingredients": ["ingredient 1", "ingredient 2", ...],
  "instructions": ["step 1", "step 2", ...]
}}

Ensure that:
- The ingredients list contains every section of ingredients (main, sauce, garnish, etc.).
- Do not include nutritional info.
- Do not include cooking steps in the ingredient list.
- The instructions are only step-by-step directions (no repeated ingredients).
- Format quantities properly (e.g., "1 cup flour", not "1cup flour").

Content:
{}"#,
        truncate_chars(page_text, budget)
    )
}

/// Take the first `budget` characters without ever splitting a code point.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
