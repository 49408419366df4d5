//! Claim manager: time-boxed exclusive ownership of work items
//!
//! A claim is one row's (claimed_by, claim_role, claim_expires_at) triple.
//! Expiry is lazy: an expired claim is simply treated as free by every
//! predicate here; no timer ever fires.
//!
//! Both grant paths are single conditional UPDATEs. SQLite executes each
//! statement atomically under its writer lock, so concurrent claimers race
//! on the `unclaimed-or-expired` guard and exactly one wins.

use crate::error::{Error, Result};
use crate::{notify, store};
use clipflow_common::db::settings;
use clipflow_common::events::WorkflowEvent;
use clipflow_common::time::minutes_to_ms;
use clipflow_common::workflow::Role;
use sqlx::SqlitePool;
use tracing::debug;

/// Fallback claim TTL when the setting is unreadable
pub const DEFAULT_CLAIM_TTL_MINUTES: i64 = 240;

/// Claim TTL from settings, in milliseconds
pub async fn claim_ttl_ms(pool: &SqlitePool) -> Result<i64> {
    let minutes = settings::get_i64(pool, "claim_ttl_minutes", DEFAULT_CLAIM_TTL_MINUTES).await?;
    Ok(minutes_to_ms(minutes))
}

/// Grant an exclusive claim on `video_id` to `actor_id` for `role`
///
/// Succeeds when the item is unclaimed or its claim has expired; fails with
/// `AlreadyClaimed` naming the current holder when one is observable. On
/// success the
/// claim expires at `now + claim_ttl` and an 'assigned' notification is
/// recorded best-effort.
///
/// Returns the new claim expiry (epoch ms).
pub async fn claim(
    pool: &SqlitePool,
    video_id: &str,
    actor_id: &str,
    role: Role,
    now: i64,
) -> Result<i64> {
    let video = store::get_video(pool, video_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video {}", video_id)))?;

    let expires_at = now + claim_ttl_ms(pool).await?;

    // A lost CAS normally means another live holder. A concurrent release can
    // clear the row between the UPDATE and the holder lookup, so retry the
    // grant once before reporting contention.
    for _ in 0..2 {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET claimed_by = ?, claim_role = ?, claim_expires_at = ?, updated_at = ?
            WHERE id = ? AND (claimed_by IS NULL OR claim_expires_at <= ?)
            "#,
        )
        .bind(actor_id)
        .bind(role.as_str())
        .bind(expires_at)
        .bind(now)
        .bind(video_id)
        .bind(now)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!("Actor {} claimed video {} as {}", actor_id, video_id, role);
            notify::record(pool, &WorkflowEvent::assigned(video_id, actor_id, role, &video.title))
                .await;
            return Ok(expires_at);
        }

        let holder = sqlx::query_scalar::<_, Option<String>>(
            "SELECT claimed_by FROM videos WHERE id = ?",
        )
        .bind(video_id)
        .fetch_one(pool)
        .await?;

        if holder.is_some() {
            return Err(Error::AlreadyClaimed { claimed_by: holder });
        }
    }

    Err(Error::AlreadyClaimed { claimed_by: None })
}

/// Release a claim held by `actor_id`
///
/// Idempotent: if the actor is not the current holder (including the
/// already-released case) nothing happens and no error is surfaced.
pub async fn release(pool: &SqlitePool, video_id: &str, actor_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET claimed_by = NULL, claim_role = NULL, claim_expires_at = NULL, updated_at = ?
        WHERE id = ? AND claimed_by = ?
        "#,
    )
    .bind(clipflow_common::time::now_ms())
    .bind(video_id)
    .bind(actor_id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        debug!("Actor {} released video {}", actor_id, video_id);
    }

    Ok(())
}
