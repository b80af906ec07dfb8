//! Application state shared across handlers.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::auth::{AuthConfig, AuthState, TokenService, password};
use crate::book::BookRepository;
use crate::db::Database;
use crate::user::{UserRepository, UserService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity service for registration and credential checks.
    pub users: Arc<UserService>,
    /// Book repository.
    pub books: BookRepository,
    /// Token service for issuing access tokens.
    pub tokens: Arc<TokenService>,
    /// Authentication state for the request gate.
    pub auth: AuthState,
}

impl AppState {
    /// Create application state from the database and auth configuration.
    ///
    /// The signing secret is resolved exactly once here; nothing mutates it
    /// afterwards.
    pub fn new(db: &Database, auth_config: &AuthConfig) -> Result<Self> {
        let secret = auth_config
            .resolve_jwt_secret()
            .context("resolving JWT secret")?
            .context("JWT secret is not configured")?;

        let tokens = Arc::new(TokenService::new(&secret, auth_config.token_ttl_secs));
        let user_repo = UserRepository::new(db.pool().clone());
        let bcrypt_cost = auth_config.bcrypt_cost.unwrap_or_else(password::default_cost);

        Ok(Self {
            users: Arc::new(UserService::new(user_repo.clone(), bcrypt_cost)),
            books: BookRepository::new(db.pool().clone()),
            tokens: tokens.clone(),
            auth: AuthState::new(auth_config.clone(), tokens, user_repo),
        })
    }
}
