use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::require_fields;
use crate::{
    auth::{ensure_post_owner, AuthUser},
    error::AppError,
    models::{
        post::{Post, PostPayload, SearchQuery},
        MessageResponse,
    },
    AppState,
};

const POST_SELECT: &str = "SELECT posts.id, posts.title, posts.content, posts.user_id, \
     users.username, posts.created_at \
     FROM posts JOIN users ON users.id = posts.user_id";

const NEWEST_FIRST: &str = "ORDER BY posts.created_at DESC, posts.id DESC";

pub(crate) async fn fetch_post(db: &SqlitePool, post_id: i64) -> Result<Option<Post>, AppError> {
    let post = sqlx::query_as::<_, Post>(&format!("{POST_SELECT} WHERE posts.id = ?"))
        .bind(post_id)
        .fetch_optional(db)
        .await?;
    Ok(post)
}

pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let Json(payload) = payload?;
    require_fields(
        &[payload.title.as_str(), payload.content.as_str()],
        "Title and content are required",
    )?;

    let post_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (title, content, user_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(payload.title.trim())
    .bind(payload.content.trim())
    .bind(user.user_id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(post_id, user_id = user.user_id, "Created post");

    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let posts = sqlx::query_as::<_, Post>(&format!("{POST_SELECT} {NEWEST_FIRST}"))
        .fetch_all(&state.db)
        .await?;
    Ok(Json(posts))
}

/// Case-insensitive substring match on title or content. A blank query lists everything.
pub async fn search_posts(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Post>>, AppError> {
    let Query(query) = query?;
    let needle = query.q.trim();
    if needle.is_empty() {
        return list_posts(State(state)).await;
    }

    let pattern = format!("%{}%", escape_like(needle));
    let posts = sqlx::query_as::<_, Post>(&format!(
        "{POST_SELECT} WHERE posts.title LIKE ? ESCAPE '\\' \
         OR posts.content LIKE ? ESCAPE '\\' {NEWEST_FIRST}"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Post>, AppError> {
    let Path(post_id) = post_id?;
    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;
    Ok(Json(post))
}

pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    post_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<Post>, AppError> {
    let Path(post_id) = post_id?;
    ensure_post_owner(&state.db, post_id, user).await?;

    let Json(payload) = payload?;
    require_fields(
        &[payload.title.as_str(), payload.content.as_str()],
        "Title and content are required",
    )?;

    sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
        .bind(payload.title.trim())
        .bind(payload.content.trim())
        .bind(post_id)
        .execute(&state.db)
        .await?;

    tracing::info!(post_id, user_id = user.user_id, "Updated post");

    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(post_id) = post_id?;
    ensure_post_owner(&state.db, post_id, user).await?;

    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(&state.db)
        .await?;

    tracing::info!(post_id, user_id = user.user_id, "Deleted post");

    Ok(Json(MessageResponse::new("Post deleted successfully!")))
}

/// Escapes LIKE wildcards so user input matches literally under `ESCAPE '\'`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
