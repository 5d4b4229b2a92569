use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::{require_fields, require_password};
use crate::{
    auth::{
        password::{hash_password, verify_password},
        AuthUser,
    },
    error::{is_unique_violation, AppError},
    models::{
        user::{AuthResponse, LoginPayload, RegisterPayload, User},
        MessageResponse,
    },
    AppState,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    const MISSING: &str = "Username, email, and password are required";
    require_fields(&[payload.username.as_str(), payload.email.as_str()], MISSING)?;
    require_password(&payload.password, MISSING)?;

    let username = payload.username.trim();
    let email = payload.email.trim();

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email already exists".to_string())
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully!")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    const MISSING: &str = "Email and password are required";
    require_fields(&[payload.email.as_str()], MISSING)?;
    require_password(&payload.password, MISSING)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(payload.email.trim())
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "Issued token");

    Ok(Json(AuthResponse { token }))
}

/// Profile of the token's owner, read fresh from the store.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user))
}
