use crate::auth::CurrentUser;
use crate::db::{self, MealPlanRow, MealType};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub date: Date,
    pub meal_type: MealType,
    #[serde(default)]
    pub recipe_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MealPlanQuery {
    #[serde(default)]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub id: i64,
    pub date: Date,
    pub meal_type: MealType,
    pub recipe_id: Option<i64>,
}

impl From<MealPlanRow> for MealPlanResponse {
    fn from(row: MealPlanRow) -> Self {
        MealPlanResponse {
            id: row.id,
            date: row.date,
            meal_type: row.meal_type,
            recipe_id: row.recipe_id,
        }
    }
}

pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateMealPlanRequest>,
) -> Result<(StatusCode, Json<MealPlanResponse>), ApiError> {
    // A referenced recipe must exist and belong to the caller
    if let Some(recipe_id) = payload.recipe_id {
        db::get_recipe(&state.db, &user.email, recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;
    }

    let row = db::insert_meal_plan(
        &state.db,
        &user.email,
        payload.date,
        payload.meal_type,
        payload.recipe_id,
    )
    .await?;

    info!("added meal plan entry {} for {}", row.id, user.email);
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MealPlanQuery>,
) -> Result<Json<Vec<MealPlanResponse>>, ApiError> {
    let rows = db::list_meal_plans(&state.db, &user.email, query.date).await?;
    Ok(Json(rows.into_iter().map(MealPlanResponse::from).collect()))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = db::delete_meal_plan(&state.db, &user.email, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Meal plan entry not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
