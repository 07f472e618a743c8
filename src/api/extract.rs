use crate::error::ApiError;
use crate::model::ExtractedRecipe;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecipeUrl {
    pub url: String,
}

/// Run the extraction pipeline for a URL. Fallback between strategies is
/// internal; the caller sees either a structured recipe or a terminal error.
pub async fn extract_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RecipeUrl>,
) -> Result<Json<ExtractedRecipe>, ApiError> {
    info!("extraction requested for {}", payload.url);
    let recipe = state.pipeline.extract(&payload.url).await?;
    Ok(Json(recipe))
}
