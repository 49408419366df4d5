//! Notification endpoints
//!
//! Read side of the best-effort notification stream: unread items addressed
//! to the caller directly or broadcast to the caller's role.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use clipflow_common::api::ApiResponse;
use clipflow_common::db::models::{Actor, Notification};
use serde_json::json;

use crate::error::Result;
use crate::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse>> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT * FROM notifications
        WHERE read = 0 AND (actor_id = ? OR (actor_id IS NULL AND role = ?))
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(&actor.id)
    .bind(&actor.role)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::ok(json!(notifications))))
}

/// POST /api/notifications/:id/read
///
/// Marks a notification read. Idempotent; marking someone else's
/// notification is a silent no-op.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>> {
    sqlx::query(
        r#"
        UPDATE notifications SET read = 1
        WHERE id = ? AND (actor_id = ? OR (actor_id IS NULL AND role = ?))
        "#,
    )
    .bind(&id)
    .bind(&actor.id)
    .bind(&actor.role)
    .execute(&state.db)
    .await?;

    Ok(Json(ApiResponse::ok_empty()))
}
