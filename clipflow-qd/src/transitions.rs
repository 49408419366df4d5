//! Status transition validator
//!
//! All validation happens before any write, and the write itself is a single
//! UPDATE re-checking the claim and current status, so an invalid or raced
//! transition never partially applies.

use crate::error::{Error, Result};
use crate::{notify, store};
use clipflow_common::db::models::Video;
use clipflow_common::events::WorkflowEvent;
use clipflow_common::workflow::{next_status, required_fields, RecordingStatus, Role};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Role-specific payload submitted with a transition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionPayload {
    /// Notes stored under the submitting role's column
    pub notes: Option<String>,
    pub final_video_url: Option<String>,
    pub posted_url: Option<String>,
    pub posted_platform: Option<String>,
    pub posted_account: Option<String>,
}

impl TransitionPayload {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "final_video_url" => self.final_video_url.as_deref(),
            "posted_url" => self.posted_url.as_deref(),
            "posted_platform" => self.posted_platform.as_deref(),
            "posted_account" => self.posted_account.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Submit a status transition for `video_id`
///
/// Preconditions, checked in order without mutating state:
/// 1. the actor holds a live claim with matching role (else FORBIDDEN)
/// 2. `target` is the single legal next status for (current, role)
/// 3. required payload fields for `target` are present
///
/// On success the status advances, `last_status_changed_at` is stamped,
/// role payload columns are stored, the claim is released, and a handoff
/// notification goes out when the new status belongs to a different role.
pub async fn submit_transition(
    pool: &SqlitePool,
    video_id: &str,
    actor_id: &str,
    role: Role,
    target: RecordingStatus,
    payload: &TransitionPayload,
    now: i64,
) -> Result<Video> {
    let video = store::get_video(pool, video_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video {}", video_id)))?;

    // Claim check
    let holds_claim = video.claimed_by.as_deref() == Some(actor_id)
        && video.claim_role.as_deref() == Some(role.as_str())
        && video.has_active_claim(now);
    if !holds_claim {
        return Err(Error::Forbidden(
            "No active claim for this item and role".to_string(),
        ));
    }

    // Legal next status check
    let current = video
        .status()
        .ok_or_else(|| Error::BadRequest(format!("Unknown status: {}", video.recording_status)))?;
    match next_status(current, role) {
        Some(expected) if expected == target => {}
        _ => {
            return Err(Error::Validation {
                field: None,
                message: format!(
                    "Illegal transition from {} to {} for role {}",
                    current, target, role
                ),
            });
        }
    }

    // Required payload fields
    for field in required_fields(target) {
        if payload.field(field).is_none() {
            return Err(Error::missing_field(field));
        }
    }

    let notes_column = match role {
        Role::Recorder => "recording_notes",
        Role::Editor => "editor_notes",
        Role::Uploader => "uploader_notes",
    };

    // Apply: guarded by the same claim and status predicates so a concurrent
    // expiry-takeover or duplicate submit cannot double-apply
    let sql = format!(
        r#"
        UPDATE videos
        SET recording_status = ?,
            last_status_changed_at = ?,
            updated_at = ?,
            claimed_by = NULL, claim_role = NULL, claim_expires_at = NULL,
            {} = COALESCE(?, {}),
            final_video_url = COALESCE(?, final_video_url),
            posted_url = COALESCE(?, posted_url),
            posted_platform = COALESCE(?, posted_platform),
            posted_account = COALESCE(?, posted_account)
        WHERE id = ? AND recording_status = ?
          AND claimed_by = ? AND claim_role = ? AND claim_expires_at > ?
        "#,
        notes_column, notes_column
    );

    let result = sqlx::query(&sql)
        .bind(target.as_str())
        .bind(now)
        .bind(now)
        .bind(&payload.notes)
        .bind(&payload.final_video_url)
        .bind(&payload.posted_url)
        .bind(&payload.posted_platform)
        .bind(&payload.posted_account)
        .bind(video_id)
        .bind(current.as_str())
        .bind(actor_id)
        .bind(role.as_str())
        .bind(now)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        // Claim or status changed between check and apply
        return Err(Error::Forbidden(
            "Claim no longer valid for this item".to_string(),
        ));
    }

    let updated = store::get_video(pool, video_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video {}", video_id)))?;

    info!(
        "Video {} advanced {} -> {} by actor {} ({})",
        video_id, current, target, actor_id, role
    );

    // Handoff notification when the new stage belongs to another role
    if let Some(next_role) = Role::next_role_for(target) {
        notify::record(pool, &WorkflowEvent::handoff(video_id, next_role, &updated.title)).await;
    } else {
        debug!("No handoff for status {}", target);
    }

    Ok(updated)
}
