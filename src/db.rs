use crate::config::DatabaseConfig;
use crate::model::ExtractedRecipe;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// True for a Postgres unique-constraint violation (duplicate key).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub ingredients: Json<Vec<String>>,
    pub instructions: Json<Vec<String>>,
    pub owner_email: String,
    pub original_url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, FromRow)]
pub struct MealPlanRow {
    pub id: i64,
    pub owner_email: String,
    pub date: Date,
    pub meal_type: MealType,
    pub recipe_id: Option<i64>,
}

// --- users ---

pub async fn create_user(
    db: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING email, name, password_hash
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_one(db)
    .await
}

pub async fn find_user(db: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"SELECT email, name, password_hash FROM users WHERE email = $1"#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

// --- recipes ---

pub async fn insert_recipe(
    db: &PgPool,
    owner_email: &str,
    recipe: &ExtractedRecipe,
) -> Result<RecipeRow, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        INSERT INTO recipes (title, ingredients, instructions, owner_email, original_url, image_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, ingredients, instructions, owner_email, original_url, image_url, created_at
        "#,
    )
    .bind(&recipe.title)
    .bind(Json(recipe.ingredients.clone()))
    .bind(Json(recipe.instructions.clone()))
    .bind(owner_email)
    .bind(&recipe.original_url)
    .bind(&recipe.image_url)
    .fetch_one(db)
    .await
}

pub async fn list_recipes(db: &PgPool, owner_email: &str) -> Result<Vec<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, title, ingredients, instructions, owner_email, original_url, image_url, created_at
        FROM recipes
        WHERE owner_email = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_email)
    .fetch_all(db)
    .await
}

pub async fn get_recipe(
    db: &PgPool,
    owner_email: &str,
    id: i64,
) -> Result<Option<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, title, ingredients, instructions, owner_email, original_url, image_url, created_at
        FROM recipes
        WHERE id = $1 AND owner_email = $2
        "#,
    )
    .bind(id)
    .bind(owner_email)
    .fetch_optional(db)
    .await
}

/// Delete an owned recipe. Meal-plan entries pointing at it get a nulled
/// `recipe_id` via the schema's ON DELETE SET NULL. Returns the number of
/// rows removed (0 when the recipe is absent or owned by someone else).
pub async fn delete_recipe(db: &PgPool, owner_email: &str, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM recipes WHERE id = $1 AND owner_email = $2"#)
        .bind(id)
        .bind(owner_email)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

// --- meal plans ---

pub async fn insert_meal_plan(
    db: &PgPool,
    owner_email: &str,
    date: Date,
    meal_type: MealType,
    recipe_id: Option<i64>,
) -> Result<MealPlanRow, sqlx::Error> {
    sqlx::query_as::<_, MealPlanRow>(
        r#"
        INSERT INTO meal_plans (owner_email, date, meal_type, recipe_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_email, date, meal_type, recipe_id
        "#,
    )
    .bind(owner_email)
    .bind(date)
    .bind(meal_type)
    .bind(recipe_id)
    .fetch_one(db)
    .await
}

pub async fn list_meal_plans(
    db: &PgPool,
    owner_email: &str,
    date: Option<Date>,
) -> Result<Vec<MealPlanRow>, sqlx::Error> {
    match date {
        Some(date) => {
            sqlx::query_as::<_, MealPlanRow>(
                r#"
                SELECT id, owner_email, date, meal_type, recipe_id
                FROM meal_plans
                WHERE owner_email = $1 AND date = $2
                ORDER BY date, id
                "#,
            )
            .bind(owner_email)
            .bind(date)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, MealPlanRow>(
                r#"
                SELECT id, owner_email, date, meal_type, recipe_id
                FROM meal_plans
                WHERE owner_email = $1
                ORDER BY date, id
                "#,
            )
            .bind(owner_email)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn delete_meal_plan(db: &PgPool, owner_email: &str, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM meal_plans WHERE id = $1 AND owner_email = $2"#)
        .bind(id)
        .bind(owner_email)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MealType::Breakfast).unwrap(), r#""breakfast""#);
        assert_eq!(
            serde_json::from_str::<MealType>(r#""snack""#).unwrap(),
            MealType::Snack
        );
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        assert!(serde_json::from_str::<MealType>(r#""brunch""#).is_err());
    }
}
