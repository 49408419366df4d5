//! Dispatcher: auto-assignment of the next eligible work item
//!
//! Selection and claiming happen in one UPDATE statement whose target id
//! comes from a subquery over the eligible set. SQLite evaluates the whole
//! statement atomically under its writer lock, so two concurrent dispatch
//! calls can never be handed the same item: the loser's subquery re-runs
//! after the winner commits and picks the next item (or nothing).

use crate::error::{Error, Result};
use crate::{claims, notify};
use clipflow_common::db::models::{Actor, Video};
use clipflow_common::db::settings;
use clipflow_common::events::WorkflowEvent;
use clipflow_common::workflow::Role;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

/// An active assignment returned by dispatch and my-active
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub video_id: String,
    pub assigned_expires_at: i64,
}

/// Result of a dispatch attempt
#[derive(Debug)]
pub struct DispatchResult {
    pub assignment: Assignment,
    /// True when a previous assignment had expired and was implicitly released
    pub previous_expired: bool,
}

/// The actor's current assignment for `role`, if any
///
/// Expired assignments are implicitly released and reported via the bool so
/// the caller can inform the user; a live assignment is never masked by
/// expired rows left behind for the same actor.
pub async fn active_assignment(
    pool: &SqlitePool,
    actor_id: &str,
    role: Role,
    now: i64,
) -> Result<(Option<Assignment>, bool)> {
    // Sweep expired claims first so a lapse is reported exactly once
    let expired: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM videos WHERE claimed_by = ? AND claim_role = ? AND claim_expires_at <= ?",
    )
    .bind(actor_id)
    .bind(role.as_str())
    .bind(now)
    .fetch_all(pool)
    .await?;

    let previous_expired = !expired.is_empty();
    for video_id in &expired {
        claims::release(pool, video_id, actor_id).await?;
        debug!("Released expired assignment of video {} from {}", video_id, actor_id);
    }

    let live = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos WHERE claimed_by = ? AND claim_role = ? AND claim_expires_at > ? LIMIT 1",
    )
    .bind(actor_id)
    .bind(role.as_str())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    let assignment = live.map(|video| Assignment {
        video_id: video.id,
        assigned_expires_at: video.claim_expires_at.unwrap_or(0),
    });

    Ok((assignment, previous_expired))
}

/// Dispatch the next eligible item to `actor` for `role`
///
/// Order of checks matters: plan gating runs before any selection, and an
/// existing unexpired assignment is returned unchanged (idempotent re-entry).
/// Fails with `NoWorkAvailable` when the eligible set is empty; the error
/// still carries the lapse flag, since the expired claim was already swept.
pub async fn dispatch_next(
    pool: &SqlitePool,
    actor: &Actor,
    role: Role,
    now: i64,
) -> Result<DispatchResult> {
    // Gating first, before selection
    let gated = settings::get_bool(pool, "dispatch_requires_subscription", false).await?;
    if gated && !actor.has_subscription() {
        return Err(Error::SubscriptionRequired);
    }

    // Idempotent re-entry on an existing live assignment
    let (existing, previous_expired) = active_assignment(pool, &actor.id, role, now).await?;
    if let Some(assignment) = existing {
        return Ok(DispatchResult {
            assignment,
            previous_expired,
        });
    }

    let expires_at = now + claims::claim_ttl_ms(pool).await?;
    let eligible = role.eligible_status();

    // Atomic select-and-claim: oldest eligible unclaimed item, rush first.
    // Within one stage every item shares the same SLA threshold, so this
    // ordering equals descending priority_score.
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET claimed_by = ?, claim_role = ?, claim_expires_at = ?, updated_at = ?
        WHERE id = (
            SELECT id FROM videos
            WHERE recording_status = ?
              AND (claimed_by IS NULL OR claim_expires_at <= ?)
            ORDER BY CASE priority WHEN 'rush' THEN 0 ELSE 1 END,
                     last_status_changed_at ASC
            LIMIT 1
        )
        AND (claimed_by IS NULL OR claim_expires_at <= ?)
        "#,
    )
    .bind(&actor.id)
    .bind(role.as_str())
    .bind(expires_at)
    .bind(now)
    .bind(eligible.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NoWorkAvailable { previous_expired });
    }

    let video = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos WHERE claimed_by = ? AND claim_role = ? AND claim_expires_at = ?",
    )
    .bind(&actor.id)
    .bind(role.as_str())
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    debug!("Dispatched video {} to actor {} as {}", video.id, actor.id, role);
    notify::record(pool, &WorkflowEvent::assigned(&video.id, &actor.id, role, &video.title)).await;

    Ok(DispatchResult {
        assignment: Assignment {
            video_id: video.id,
            assigned_expires_at: expires_at,
        },
        previous_expired,
    })
}
