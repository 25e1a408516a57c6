mod common;

use axum::http::StatusCode;
use catalog_api::domain::entities::Role;
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn test_admin_creates_user_with_role(pool: PgPool) {
    let app = common::spawn_app(pool);
    let token = app.admin_token().await;

    let response = app
        .server
        .post("/api/v1/users")
        .authorization_bearer(&token)
        .json(&json!({
            "username": "critic",
            "email": "critic@example.com",
            "bio": "Watches everything",
            "role": "moderator"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.assert_json(&json!({
        "username": "critic",
        "email": "critic@example.com",
        "first_name": "",
        "last_name": "",
        "bio": "Watches everything",
        "role": "moderator"
    }));

    let stored = app.user("critic").await.unwrap();
    assert_eq!(stored.role, Role::Moderator);
    assert!(!stored.confirmation_key.is_empty());
}

#[sqlx::test]
async fn test_user_admin_endpoints_require_admin(pool: PgPool) {
    let app = common::spawn_app(pool);
    let (_, token) = app.user_with_token("alice", Role::User).await;

    app.server
        .get("/api/v1/users")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get("/api/v1/users/alice")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get("/api/v1/users")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_list_and_search_users(pool: PgPool) {
    let app = common::spawn_app(pool);
    let token = app.admin_token().await;
    app.insert_user("alice", Role::User).await;
    app.insert_user("bob", Role::User).await;

    let body = app
        .server
        .get("/api/v1/users")
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(body["count"], 3);

    let body = app
        .server
        .get("/api/v1/users")
        .authorization_bearer(&token)
        .add_query_param("search", "ali")
        .await
        .json::<Value>();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "alice");
}

#[sqlx::test]
async fn test_admin_changes_role_and_deletes(pool: PgPool) {
    let app = common::spawn_app(pool);
    let token = app.admin_token().await;
    app.insert_user("alice", Role::User).await;

    let response = app
        .server
        .patch("/api/v1/users/alice")
        .authorization_bearer(&token)
        .json(&json!({"role": "admin"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["role"], "admin");

    app.server
        .delete("/api/v1/users/alice")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get("/api/v1/users/alice")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_duplicate_username_rejected(pool: PgPool) {
    let app = common::spawn_app(pool);
    let token = app.admin_token().await;
    app.insert_user("alice", Role::User).await;

    let response = app
        .server
        .post("/api/v1/users")
        .authorization_bearer(&token)
        .json(&json!({"username": "alice", "email": "new@example.com"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]["details"].get("username").is_some());
}

// ─── /users/me ───────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_me_returns_own_profile(pool: PgPool) {
    let app = common::spawn_app(pool);
    let (_, token) = app.user_with_token("alice", Role::User).await;

    let response = app
        .server
        .get("/api/v1/users/me")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
}

#[sqlx::test]
async fn test_me_update_ignores_role(pool: PgPool) {
    let app = common::spawn_app(pool);
    let (_, token) = app.user_with_token("alice", Role::User).await;

    let response = app
        .server
        .patch("/api/v1/users/me")
        .authorization_bearer(&token)
        .json(&json!({"bio": "Film buff", "role": "admin"}))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["bio"], "Film buff");
    assert_eq!(body["role"], "user");
    assert_eq!(app.user("alice").await.unwrap().role, Role::User);
}
