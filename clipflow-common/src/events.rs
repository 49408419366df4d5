//! Notification event types
//!
//! Emitted when work changes hands. Delivery is best-effort: the core
//! claim/transition path never depends on a notification write succeeding.

use crate::workflow::Role;
use serde::{Deserialize, Serialize};

/// Kind of workflow notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Work item claimed by or dispatched to a specific actor
    Assigned,
    /// Work item advanced into a stage owned by the next role
    Handoff,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Assigned => "assigned",
            NotificationKind::Handoff => "handoff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(NotificationKind::Assigned),
            "handoff" => Some(NotificationKind::Handoff),
            _ => None,
        }
    }
}

/// A workflow event to be recorded as a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub kind: NotificationKind,
    pub video_id: String,
    /// Specific recipient, or None to broadcast to everyone in `role`
    pub actor_id: Option<String>,
    pub role: Role,
    pub message: String,
}

impl WorkflowEvent {
    /// An item was assigned to one actor
    pub fn assigned(video_id: &str, actor_id: &str, role: Role, title: &str) -> Self {
        Self {
            kind: NotificationKind::Assigned,
            video_id: video_id.to_string(),
            actor_id: Some(actor_id.to_string()),
            role,
            message: format!("Assigned to you ({}): {}", role, title),
        }
    }

    /// An item entered a stage owned by `role`; broadcast to that role
    pub fn handoff(video_id: &str, role: Role, title: &str) -> Self {
        Self {
            kind: NotificationKind::Handoff,
            video_id: video_id.to_string(),
            actor_id: None,
            role,
            message: format!("Ready for {}: {}", role, title),
        }
    }
}
