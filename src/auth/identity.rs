use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::{error::AppError, AppState};

/// Identity resolved from a verified bearer token.
///
/// Taking `AuthUser` as a handler argument gates the route: the request is
/// rejected with 401 before the body is read if the token is missing, malformed,
/// tampered with, or expired. Verification is pure and never touches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            AppError::Unauthenticated
        })?;

        let claims = state.tokens.verify(token)?;

        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}

/// Pulls `<token>` out of `Authorization: Bearer <token>`. The scheme name is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let (scheme, token) = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    Some(token.trim()).filter(|t| !t.is_empty())
}
