//! API request handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::{AuthError, CurrentUser};
use crate::book::{BookListQuery, CreateBookRequest, UpdateBookRequest};
use crate::user::UserInfo;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: a bearer access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Register a new identity.
///
/// Duplicate emails surface as a conflict; the race between two concurrent
/// registrations is resolved by the store's uniqueness constraint.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.register(request.email, request.password).await?;

    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// Login with email and password.
///
/// An unknown email and a wrong password produce the same response, so the
/// caller learns nothing beyond "the pair did not match".
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .users
        .verify_credentials(&request.email, &request.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let access_token = state.tokens.issue(&user.email)?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Get the authenticated identity.
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(user.user.into())
}

// ============================================================================
// Book Handlers
// ============================================================================

/// Create a book.
#[instrument(skip(state, request), fields(title = %request.title))]
pub async fn create_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<CreateBookRequest>,
) -> ApiResult<impl IntoResponse> {
    let book = state.books.create(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List books with pagination and filters.
#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<BookListQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state.books.list(query).await?;
    Ok(Json(page))
}

/// Get a single book.
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(book_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let book = state
        .books
        .get(book_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Book not found: {book_id}")))?;

    Ok(Json(book))
}

/// Partially update a book.
#[instrument(skip(state, request))]
pub async fn update_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(book_id): Path<i64>,
    Json(request): Json<UpdateBookRequest>,
) -> ApiResult<impl IntoResponse> {
    let book = state.books.update(book_id, request).await?;
    Ok(Json(book))
}

/// Delete a book.
#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(book_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.books.delete(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
