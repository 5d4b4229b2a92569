use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{auth, likes, posts},
    AppState,
};

/// JSON API mounted under `/api`. Routes taking `AuthUser` require a bearer token.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/search", get(posts::search_posts))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/posts/:id/like",
            get(likes::like_info)
                .post(likes::like_post)
                .delete(likes::unlike_post),
        );

    Router::new()
        .nest("/api", api)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
