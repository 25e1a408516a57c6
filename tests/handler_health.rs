mod common;

use axum::http::StatusCode;
use serde_json::Value;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_ok(pool: PgPool) {
    let app = common::spawn_app(pool);

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[sqlx::test]
async fn test_health_degraded_when_database_down(pool: PgPool) {
    let app = common::spawn_app(pool);
    app.pool.close().await;

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"]["status"], "error");
}
