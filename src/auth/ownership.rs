use sqlx::SqlitePool;

use super::AuthUser;
use crate::error::AppError;

/// Allows a post mutation only for the post's owner.
///
/// Ownership is set once at creation and no statement ever rewrites
/// `posts.user_id`, so the check and the following write need no shared
/// transaction. Making ownership mutable would break that assumption.
pub async fn ensure_post_owner(
    db: &SqlitePool,
    post_id: i64,
    user: AuthUser,
) -> Result<(), AppError> {
    let owner = sqlx::query_scalar::<_, i64>("SELECT user_id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    if owner != user.user_id {
        tracing::warn!(
            post_id,
            owner,
            user_id = user.user_id,
            "Rejected mutation by non-owner"
        );
        return Err(AppError::Forbidden);
    }

    Ok(())
}
