use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::{
    auth::AuthUser,
    error::{is_unique_violation, AppError},
    models::{like::LikeInfo, MessageResponse},
    AppState,
};

/// `NotLiked -> Liked`. A second like by the same user is a conflict, not a no-op.
pub async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(post_id) = post_id?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM likes WHERE user_id = ? AND post_id = ?",
    )
    .bind(user.user_id)
    .bind(post_id)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Already liked".to_string()));
    }

    // The UNIQUE(user_id, post_id) index settles concurrent likes.
    sqlx::query("INSERT INTO likes (user_id, post_id) VALUES (?, ?)")
        .bind(user.user_id)
        .bind(post_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Already liked".to_string())
            } else {
                e.into()
            }
        })?;

    tracing::debug!(post_id, user_id = user.user_id, "Liked post");

    Ok(Json(MessageResponse::new("Post liked!")))
}

/// `Liked -> NotLiked`. Succeeds whether or not a like existed.
pub async fn unlike_post(
    State(state): State<AppState>,
    user: AuthUser,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(post_id) = post_id?;

    let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND post_id = ?")
        .bind(user.user_id)
        .bind(post_id)
        .execute(&state.db)
        .await?;

    tracing::debug!(
        post_id,
        user_id = user.user_id,
        removed = result.rows_affected(),
        "Unliked post"
    );

    Ok(Json(MessageResponse::new("Post unliked!")))
}

pub async fn like_info(
    State(state): State<AppState>,
    user: AuthUser,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LikeInfo>, AppError> {
    let Path(post_id) = post_id?;

    let like_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(&state.db)
        .await?;

    let liked_by_user = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM likes WHERE user_id = ? AND post_id = ?",
    )
    .bind(user.user_id)
    .bind(post_id)
    .fetch_optional(&state.db)
    .await?
    .is_some();

    Ok(Json(LikeInfo {
        like_count,
        liked_by_user,
    }))
}
