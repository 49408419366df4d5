//! Best-effort notification recording
//!
//! Notifications are advisory. A failed insert is logged and swallowed so
//! the claim/dispatch/transition paths never fail on notification delivery.

use clipflow_common::events::WorkflowEvent;
use clipflow_common::time::now_ms;
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

/// Record a workflow event as a notification row; never fails the caller
pub async fn record(pool: &SqlitePool, event: &WorkflowEvent) {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (id, actor_id, role, kind, video_id, message, read, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&event.actor_id)
    .bind(event.role.as_str())
    .bind(event.kind.as_str())
    .bind(&event.video_id)
    .bind(&event.message)
    .bind(now_ms())
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!(
            "Failed to record {} notification for video {}: {}",
            event.kind.as_str(),
            event.video_id,
            e
        );
    }
}
