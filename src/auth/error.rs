//! Authentication errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Authentication errors.
///
/// Every variant is preserved internally for logging and tests, but all
/// token/identity failures produce the same `401 Unauthorized` response so a
/// caller cannot tell which check rejected the request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing authorization header.
    #[error("missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("invalid authorization header format")]
    InvalidAuthHeader,

    /// Token could not be parsed or its signature did not verify.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Token expired.
    #[error("token expired")]
    Expired,

    /// Token is missing the subject claim.
    #[error("missing subject claim")]
    MissingClaim,

    /// Token subject does not resolve to a known identity.
    #[error("unknown token subject")]
    UnknownSubject,

    /// Identity exists but is deactivated.
    #[error("identity is inactive")]
    Inactive,

    /// Invalid login credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::Internal(msg) => {
                error!(message = %msg, "auth internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                )
            }
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            // All other rejection kinds collapse into one uniform response.
            // The specific reason stays in the log only.
            other => {
                warn!(reason = %other, "rejected request");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "unauthorized".to_string(),
                )
            }
        };

        let body = Json(AuthErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}
