mod auth;
mod extract;
mod meal_plans;
mod recipes;

use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(auth::signup))
        .route("/token", post(auth::token))
        .route("/extract-recipe", post(extract::extract_recipe))
        .route("/save-recipe", post(recipes::save_recipe))
        .route("/recipes", get(recipes::list_recipes))
        .route(
            "/recipes/:id",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
        .route(
            "/meal-plan",
            post(meal_plans::create_entry).get(meal_plans::list_entries),
        )
        .route("/meal-plan/:id", delete(meal_plans::delete_entry))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
