//! Credential store: identity persistence.

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::User;

/// Repository for identity database operations.
///
/// Email uniqueness is enforced by the UNIQUE constraint on the table, not
/// by a check-then-insert, so two racing registrations for the same email
/// yield exactly one success and one duplicate failure.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new identity from an email and an already-hashed password.
    #[instrument(skip(self, password_hash))]
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User> {
        debug!("creating identity for {}", email);

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return anyhow!("Email '{}' is already registered.", email);
            }
            anyhow::Error::new(e).context("inserting user")
        })?;

        self.get(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow!("user not found after creation"))
    }

    /// Get an identity by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching user")?;

        Ok(user)
    }

    /// Get an identity by email. The lookup is case-sensitive, matching how
    /// emails are stored.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("fetching user by email")?;

        Ok(user)
    }

    /// Check whether an email is already registered.
    #[instrument(skip(self))]
    pub async fn exists(&self, email: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("checking email existence")?;

        Ok(count.0 > 0)
    }

    /// Count total identities.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("counting users")?;

        Ok(count.0)
    }

    /// Activate or deactivate an identity.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET is_active = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("updating user active flag")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("User not found: {}", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("user not found after update"))
    }
}
