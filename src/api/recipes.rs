use crate::auth::CurrentUser;
use crate::db::{self, RecipeRow};
use crate::error::ApiError;
use crate::model::ExtractedRecipe;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<RecipeRow> for RecipeResponse {
    fn from(row: RecipeRow) -> Self {
        RecipeResponse {
            id: row.id,
            title: row.title,
            ingredients: row.ingredients.0,
            instructions: row.instructions.0,
            original_url: row.original_url,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// Persist an extracted recipe for the authenticated caller. The owner is
/// taken from the token, never from the request body.
pub async fn save_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(recipe): Json<ExtractedRecipe>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let row = db::insert_recipe(&state.db, &user.email, &recipe).await?;
    info!("saved recipe {} for {}", row.id, user.email);
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_recipes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let rows = db::list_recipes(&state.db, &user.email).await?;
    Ok(Json(rows.into_iter().map(RecipeResponse::from).collect()))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let row = db::get_recipe(&state.db, &user.email, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;
    Ok(Json(row.into()))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = db::delete_recipe(&state.db, &user.email, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }
    info!("deleted recipe {id} for {}", user.email);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json as SqlJson;
    use time::macros::datetime;

    #[test]
    fn response_preserves_ingredient_and_instruction_order() {
        let row = RecipeRow {
            id: 7,
            title: "Pancakes".to_string(),
            ingredients: SqlJson(vec!["1 cup flour".to_string(), "2 eggs".to_string()]),
            instructions: SqlJson(vec!["Mix".to_string(), "Cook".to_string()]),
            owner_email: "cook@example.com".to_string(),
            original_url: Some("https://example.com/pancakes".to_string()),
            image_url: None,
            created_at: datetime!(2025-06-01 12:00 UTC),
        };

        let response = RecipeResponse::from(row);
        assert_eq!(response.ingredients, vec!["1 cup flour", "2 eggs"]);
        assert_eq!(response.instructions, vec!["Mix", "Cook"]);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""id":7"#));
        assert!(!json.contains("image_url"));
        // The owner never leaks into the response body
        assert!(!json.contains("cook@example.com"));
    }
}
