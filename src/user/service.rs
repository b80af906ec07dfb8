//! Identity service: registration and credential verification.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::auth::password::{hash_password, verify_password};

use super::models::User;
use super::repository::UserRepository;

/// Service for identity operations.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
    bcrypt_cost: u32,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Register a new identity with validation.
    ///
    /// The plaintext password exists only for the duration of this call; it
    /// is hashed on a blocking worker thread so the bcrypt work cannot stall
    /// other requests on the async runtime.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: String, password: String) -> Result<User> {
        if !is_valid_email(&email) {
            bail!("Invalid email format.");
        }

        if password.len() < 6 {
            bail!("Password must be at least 6 characters.");
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .context("password hashing task panicked")??;

        let user = self.repo.create(&email, &password_hash).await?;
        info!(user_id = %user.id, "registered new identity");

        Ok(user)
    }

    /// Verify login credentials.
    ///
    /// Returns the identity on success, `None` for an unknown email, a wrong
    /// password, or a deactivated identity. The caller cannot tell which;
    /// the distinction only exists here.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.repo.find_by_email(email).await?;

        match user {
            Some(user) if user.is_active => {
                let password = password.to_string();
                let hash = user.password_hash.clone();
                let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                    .await
                    .context("password verification task panicked")?;

                Ok(matches.then_some(user))
            }
            _ => Ok(None),
        }
    }

    /// Get an identity by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repo.find_by_email(email).await
    }

    /// Count registered identities.
    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    !parts[0].is_empty() && parts[1].contains('.')
}
