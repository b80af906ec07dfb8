//! Token issuance and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use super::{AuthError, Claims};

/// Issues and validates HS256-signed bearer tokens.
///
/// Constructed once at startup from the resolved signing secret; the keys
/// are never mutated afterwards. Rotating the secret invalidates all
/// outstanding tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from a signing secret and default token TTL.
    pub fn new(secret: &str, default_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry and claim presence are checked explicitly in `validate` so
        // each failure maps to its own error kind, in a fixed order.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl: Duration::seconds(default_ttl_secs),
            validation,
        }
    }

    /// Issue a token for a subject with the default TTL.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for a subject with an explicit TTL.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// Checks run in order: signature/parse integrity (`Malformed`), expiry
    /// (`Expired`), subject presence (`MissingClaim`). A token is valid for
    /// `iat <= now < exp`, with no clock-skew leeway; a zero-TTL token is
    /// therefore never valid. Validation is pure: repeated calls on the same
    /// token return the same result and mutate nothing.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("token decode failed: {:?}", e);
                AuthError::Malformed(e.to_string())
            })?;
        let claims = token_data.claims;

        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        if claims.subject().is_none() {
            return Err(AuthError::MissingClaim);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
