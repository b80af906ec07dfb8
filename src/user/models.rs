//! Identity data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identity entity from the database.
///
/// The password hash never leaves the process: it is skipped on
/// serialization, and handlers return [`UserInfo`] instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Public identity info (safe to return to clients).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_from_user() {
        let user = User {
            id: 7,
            email: "test@example.com".to_string(),
            password_hash: "secret".to_string(),
            is_active: true,
            created_at: "2026-01-01".to_string(),
            updated_at: "2026-01-01".to_string(),
        };

        let info: UserInfo = user.into();
        assert_eq!(info.id, 7);
        assert_eq!(info.email, "test@example.com");
        assert!(info.is_active);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "test@example.com".to_string(),
            password_hash: "hash-should-stay-private".to_string(),
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash-should-stay-private"));
        assert!(!json.contains("password_hash"));
    }
}
