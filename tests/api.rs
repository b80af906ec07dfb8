//! End-to-end API tests over the full router.

use axum_test::TestServer;
use chrono::Duration;
use serde_json::{Value, json};

use folio::api::{AppState, create_router};
use folio::auth::{AuthConfig, TokenService};
use folio::db::Database;
use folio::user::UserRepository;

const TEST_SECRET: &str = "test-secret-for-integration-tests-32-chars-plus";

struct TestApp {
    server: TestServer,
    state: AppState,
    db: Database,
}

async fn spawn_app() -> TestApp {
    let db = Database::in_memory().await.unwrap();
    let auth_config = AuthConfig {
        jwt_secret: Some(TEST_SECRET.to_string()),
        token_ttl_secs: 3600,
        bcrypt_cost: Some(4),
        allowed_origins: Vec::new(),
    };
    auth_config.validate().unwrap();

    let state = AppState::new(&db, &auth_config).unwrap();
    let server = TestServer::new(create_router(state.clone())).unwrap();

    TestApp { server, state, db }
}

async fn register_and_login(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_protected_access() {
    let app = spawn_app().await;

    // Register
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "email": "user@example.com", "password": "pw123456" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["email"], "user@example.com");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());

    // Login
    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "user@example.com", "password": "pw123456" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let token = body["access_token"].as_str().unwrap();

    // Authorized list
    let response = app.server.get("/books").authorization_bearer(token).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 0);

    // Same endpoint without a header is rejected before any data access.
    let response = app.server.get("/books").await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Identity echo
    let response = app.server.get("/auth/me").authorization_bearer(token).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["email"], "user@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app().await;

    let payload = json!({ "email": "dup@example.com", "password": "pw123456" });
    let response = app.server.post("/auth/register").json(&payload).await;
    assert_eq!(response.status_code(), 201);

    let response = app.server.post("/auth/register").json(&payload).await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");

    // No second identity was created.
    assert_eq!(app.state.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;

    app.server
        .post("/auth/register")
        .json(&json!({ "email": "user@example.com", "password": "pw123456" }))
        .await;

    let wrong_password = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "user@example.com", "password": "wrong123" }))
        .await;
    let unknown_email = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "pw123456" }))
        .await;

    assert_eq!(wrong_password.status_code(), 401);
    assert_eq!(unknown_email.status_code(), 401);

    // Byte-identical bodies: no signal about which part was wrong.
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_token_for_unregistered_subject_rejected() {
    let app = spawn_app().await;
    register_and_login(&app, "real@example.com", "pw123456").await;

    // Hand-crafted token, correctly signed, for an email never registered.
    let forged = TokenService::new(TEST_SECRET, 3600)
        .issue("ghost@example.com")
        .unwrap();

    let response = app.server.get("/books").authorization_bearer(&forged).await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_expired_and_malformed_tokens_rejected() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "pw123456").await;

    // Zero-TTL token is already expired.
    let expired = app
        .state
        .tokens
        .issue_with_ttl("user@example.com", Duration::zero())
        .unwrap();
    let response = app.server.get("/books").authorization_bearer(&expired).await;
    assert_eq!(response.status_code(), 401);

    // Corrupting one character breaks the signature; response shape is the
    // same as for the expired token.
    let mut corrupted = token.clone();
    let last = corrupted.pop().unwrap();
    corrupted.push(if last == 'A' { 'B' } else { 'A' });
    let response = app
        .server
        .get("/books")
        .authorization_bearer(&corrupted)
        .await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Not even a JWT.
    let response = app
        .server
        .get("/books")
        .authorization_bearer("garbage")
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_deactivated_identity_is_rejected() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "pw123456").await;

    let repo = UserRepository::new(app.db.pool().clone());
    let user = repo.find_by_email("user@example.com").await.unwrap().unwrap();
    repo.set_active(user.id, false).await.unwrap();

    // The token is still cryptographically valid; the gate rejects on the
    // identity check.
    let response = app.server.get("/auth/me").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), 401);

    // Login is also refused for a deactivated identity.
    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "user@example.com", "password": "pw123456" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_book_crud_flow() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "pw123456").await;

    // Create
    let response = app
        .server
        .post("/books")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "description": "Desert planet",
            "price": 12.5
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let book: Value = response.json();
    let book_id = book["id"].as_i64().unwrap();
    assert_eq!(book["title"], "Dune");

    app.server
        .post("/books")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Neuromancer", "author": "William Gibson", "price": 9.99 }))
        .await;

    // List with a title filter
    let response = app
        .server
        .get("/books")
        .add_query_param("title", "dune")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Dune");

    // Read
    let response = app
        .server
        .get(&format!("/books/{book_id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 200);

    // Partial update: change the price, null out the description.
    let response = app
        .server
        .put(&format!("/books/{book_id}"))
        .authorization_bearer(&token)
        .json(&json!({ "price": 15.0, "description": null }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["price"], 15.0);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["description"], Value::Null);

    // Delete
    let response = app
        .server
        .delete(&format!("/books/{book_id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 204);

    let response = app
        .server
        .get(&format!("/books/{book_id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "email": "not-an-email", "password": "pw123456" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "email": "user@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), 400);
}
