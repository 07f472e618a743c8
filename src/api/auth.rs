use crate::auth::{hash_password, verify_password};
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::Json;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub email: String,
    pub name: String,
}

/// OAuth2 password-flow shaped login form
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }
    Ok(email)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let email = normalize_email(&payload.email)?;

    if payload.password.len() < 8 {
        return Err(ApiError::BadRequest("Password too short".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = db::create_user(&state.db, &email, &payload.name, &password_hash)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                warn!("signup for already-registered email");
                ApiError::Conflict("Email already registered".to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

    info!("user {} registered", user.email);
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            email: user.email,
            name: user.name,
        }),
    ))
}

pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&form.username)?;

    let user = db::find_user(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Incorrect email or password".to_string()))?;

    if !verify_password(&form.password, &user.password_hash)? {
        warn!("failed login for {email}");
        return Err(ApiError::BadRequest(
            "Incorrect email or password".to_string(),
        ));
    }

    let access_token = state.jwt.sign(&user.email)?;
    info!("user {} logged in", user.email);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
