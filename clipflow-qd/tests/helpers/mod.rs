//! Shared test helpers for clipflow-qd integration tests

// Each test binary compiles its own copy and uses a different subset
#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use clipflow_common::db::init_database;
use clipflow_common::db::models::Actor;
use clipflow_common::time::now_ms;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

/// Create a fresh file-backed database in a temp dir.
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn setup_test_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("clipflow.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

/// Insert an actor and return it; api_key is derived from the name
pub async fn insert_actor(pool: &SqlitePool, name: &str, role: &str, plan: &str) -> Actor {
    let id = Uuid::new_v4().to_string();
    let api_key = format!("cf_ak_{}", name);

    sqlx::query(
        "INSERT INTO actors (id, name, api_key, role, plan, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(&api_key)
    .bind(role)
    .bind(plan)
    .bind(now_ms())
    .execute(pool)
    .await
    .expect("Should insert actor");

    Actor {
        id,
        name: name.to_string(),
        api_key,
        role: role.to_string(),
        plan: plan.to_string(),
        created_at: now_ms(),
    }
}

/// Insert a video row directly, bypassing the create endpoint, so tests can
/// start from any status
pub async fn insert_video_row(
    pool: &SqlitePool,
    title: &str,
    status: &str,
    last_status_changed_at: i64,
) -> String {
    let id = Uuid::new_v4().to_string();
    let now = now_ms();

    sqlx::query(
        r#"
        INSERT INTO videos (id, title, recording_status, priority, last_status_changed_at,
                            created_at, updated_at)
        VALUES (?, ?, ?, 'normal', ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(title)
    .bind(status)
    .bind(last_status_changed_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("Should insert video");

    id
}

/// Write claim fields directly (e.g. to fabricate an expired claim)
pub async fn set_claim(
    pool: &SqlitePool,
    video_id: &str,
    actor_id: &str,
    role: &str,
    expires_at: i64,
) {
    sqlx::query(
        "UPDATE videos SET claimed_by = ?, claim_role = ?, claim_expires_at = ? WHERE id = ?",
    )
    .bind(actor_id)
    .bind(role)
    .bind(expires_at)
    .bind(video_id)
    .execute(pool)
    .await
    .expect("Should set claim");
}

/// Build an authenticated request with an optional JSON body
pub fn authed_request(method: &str, uri: &str, api_key: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", api_key));

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Extract JSON body from a response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
