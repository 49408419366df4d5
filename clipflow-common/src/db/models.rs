//! Database models

use crate::sla::{Priority, SlaSnapshot};
use crate::workflow::{RecordingStatus, Role};
use serde::{Deserialize, Serialize};

/// One unit of content production moving through the pipeline.
///
/// All timestamps are epoch milliseconds. A claim is active only while
/// `claimed_by` is set and `claim_expires_at` lies in the future; an expired
/// claim is treated as unclaimed everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub recording_status: String,
    pub priority: String,
    pub claimed_by: Option<String>,
    pub claim_role: Option<String>,
    pub claim_expires_at: Option<i64>,
    pub last_status_changed_at: i64,
    /// Immutable script snapshot; never written by claim holders
    pub script_locked_text: Option<String>,
    pub recording_notes: Option<String>,
    pub editor_notes: Option<String>,
    pub uploader_notes: Option<String>,
    pub final_video_url: Option<String>,
    pub posted_url: Option<String>,
    pub posted_platform: Option<String>,
    pub posted_account: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Video {
    /// Typed status (rows only ever hold known statuses, enforced by CHECK)
    pub fn status(&self) -> Option<RecordingStatus> {
        RecordingStatus::parse(&self.recording_status)
    }

    /// Typed priority
    pub fn item_priority(&self) -> Priority {
        Priority::parse(&self.priority).unwrap_or(Priority::Normal)
    }

    /// Whether a non-expired claim exists at `now` (epoch ms)
    pub fn has_active_claim(&self, now: i64) -> bool {
        self.claimed_by.is_some() && self.claim_expires_at.map(|t| t > now).unwrap_or(false)
    }

    /// Compute SLA fields for this row at `now` (epoch ms)
    pub fn sla(&self, now: i64) -> Option<SlaSnapshot> {
        let status = self.status()?;
        Some(crate::sla::compute_sla(
            status,
            self.item_priority(),
            self.last_status_changed_at,
            now,
        ))
    }
}

/// A pipeline worker or administrator
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub role: String,
    pub plan: String,
    pub created_at: i64,
}

impl Actor {
    /// Typed worker role; None for admin accounts
    pub fn worker_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Whether this actor may act as `role`. Admins may act as any role.
    pub fn can_act_as(&self, role: Role) -> bool {
        self.is_admin() || self.worker_role() == Some(role)
    }

    pub fn has_subscription(&self) -> bool {
        self.plan == "pro"
    }
}

/// A best-effort workflow notification
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    /// Specific recipient; NULL means broadcast to everyone in `role`
    pub actor_id: Option<String>,
    pub role: String,
    pub kind: String,
    pub video_id: String,
    pub message: String,
    pub read: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
