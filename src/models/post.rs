use serde::{Deserialize, Serialize};

/// A post as returned to clients, with the owner's username joined in.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub username: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}
