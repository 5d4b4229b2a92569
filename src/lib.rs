pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rest;

use sqlx::SqlitePool;

use crate::{auth::TokenKeys, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            tokens: TokenKeys::from_secret(config.jwt_secret.as_bytes(), config.token_ttl),
        }
    }
}
