//! Authentication middleware: the request gate.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::user::{User, UserRepository};

use super::{AuthConfig, AuthError, TokenService};

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = parts.next().ok_or(AuthError::InvalidAuthHeader)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    if parts.next().is_some() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Authentication state shared by the middleware.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
    users: UserRepository,
}

impl AuthState {
    /// Create auth state from config, the token service, and the credential
    /// store.
    pub fn new(config: AuthConfig, tokens: Arc<TokenService>, users: UserRepository) -> Self {
        Self {
            config: Arc::new(config),
            tokens,
            users,
        }
    }

    /// Allowed CORS origins from config.
    pub fn allowed_origins(&self) -> &[String] {
        &self.config.allowed_origins
    }
}

/// Authenticated identity attached to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    /// The identity's ID.
    pub fn id(&self) -> i64 {
        self.user.id
    }

    /// The identity's email.
    pub fn email(&self) -> &str {
        &self.user.email
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Authentication middleware.
///
/// Per request: extract the bearer token from the Authorization header,
/// validate it, resolve the subject through the credential store, and reject
/// unless the identity exists and is active. On success `CurrentUser` is
/// inserted into request extensions for downstream handlers. Each request is
/// evaluated independently; nothing is cached between requests.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = bearer_token_from_header(header)?;
    let claims = auth.tokens.validate(token)?;

    // validate() guarantees the subject is present.
    let subject = claims.subject().ok_or(AuthError::MissingClaim)?;

    let user = auth
        .users
        .find_by_email(subject)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::UnknownSubject)?;

    if !user.is_active {
        return Err(AuthError::Inactive);
    }

    req.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_from_header_valid() {
        assert_eq!(
            bearer_token_from_header("Bearer abc.def.ghi").unwrap(),
            "abc.def.ghi"
        );
        assert_eq!(
            bearer_token_from_header("bearer   token123").unwrap(),
            "token123"
        );
        assert_eq!(
            bearer_token_from_header("   Bearer\tmixed-case ").unwrap(),
            "mixed-case"
        );
    }

    #[test]
    fn test_bearer_token_from_header_invalid() {
        let cases = [
            "",
            "Bearer",
            "Bearer ",
            "Token something",
            "Bearer token extra",
            "bear token",
        ];

        for case in cases {
            assert!(
                bearer_token_from_header(case).is_err(),
                "{case} should fail"
            );
        }
    }
}
