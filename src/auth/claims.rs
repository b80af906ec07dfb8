//! JWT claims.

use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// The subject is the email of the identity the token was issued for. It is
/// optional at the serde level so a token missing the claim can be decoded
/// and rejected with a precise error instead of a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity email).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (as Unix timestamp).
    pub iat: i64,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The subject claim, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }
}
