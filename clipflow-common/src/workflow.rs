//! Workflow domain types for the production pipeline
//!
//! A video moves through the recorder → editor → uploader handoff chain:
//! NOT_RECORDED → RECORDED → EDITED → READY_TO_POST → POSTED.
//!
//! Ancillary states (NEEDS_SCRIPT, GENERATING_SCRIPT, AI_RENDERING,
//! READY_FOR_REVIEW) are visible in queue listings but have no legal
//! transition through the dispatch service.

use serde::{Deserialize, Serialize};

/// Production status of a video work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingStatus {
    NeedsScript,
    GeneratingScript,
    AiRendering,
    ReadyForReview,
    NotRecorded,
    Recorded,
    Edited,
    ReadyToPost,
    Posted,
}

impl RecordingStatus {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStatus::NeedsScript => "NEEDS_SCRIPT",
            RecordingStatus::GeneratingScript => "GENERATING_SCRIPT",
            RecordingStatus::AiRendering => "AI_RENDERING",
            RecordingStatus::ReadyForReview => "READY_FOR_REVIEW",
            RecordingStatus::NotRecorded => "NOT_RECORDED",
            RecordingStatus::Recorded => "RECORDED",
            RecordingStatus::Edited => "EDITED",
            RecordingStatus::ReadyToPost => "READY_TO_POST",
            RecordingStatus::Posted => "POSTED",
        }
    }

    /// Parse from database/wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEEDS_SCRIPT" => Some(RecordingStatus::NeedsScript),
            "GENERATING_SCRIPT" => Some(RecordingStatus::GeneratingScript),
            "AI_RENDERING" => Some(RecordingStatus::AiRendering),
            "READY_FOR_REVIEW" => Some(RecordingStatus::ReadyForReview),
            "NOT_RECORDED" => Some(RecordingStatus::NotRecorded),
            "RECORDED" => Some(RecordingStatus::Recorded),
            "EDITED" => Some(RecordingStatus::Edited),
            "READY_TO_POST" => Some(RecordingStatus::ReadyToPost),
            "POSTED" => Some(RecordingStatus::Posted),
            _ => None,
        }
    }

    /// Terminal status for the dispatch workflow
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordingStatus::Posted)
    }
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker role in the handoff chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Recorder,
    Editor,
    Uploader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Recorder => "recorder",
            Role::Editor => "editor",
            Role::Uploader => "uploader",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recorder" => Some(Role::Recorder),
            "editor" => Some(Role::Editor),
            "uploader" => Some(Role::Uploader),
            _ => None,
        }
    }

    /// Statuses this role is eligible to pick up from the queue
    pub fn eligible_status(&self) -> RecordingStatus {
        match self {
            Role::Recorder => RecordingStatus::NotRecorded,
            Role::Editor => RecordingStatus::Recorded,
            Role::Uploader => RecordingStatus::ReadyToPost,
        }
    }

    /// Role that picks up work produced by a transition into `status`,
    /// if the transition hands off to a different role.
    pub fn next_role_for(status: RecordingStatus) -> Option<Role> {
        match status {
            RecordingStatus::NotRecorded => Some(Role::Recorder),
            RecordingStatus::Recorded => Some(Role::Editor),
            RecordingStatus::ReadyToPost => Some(Role::Uploader),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single legal next status for (current, role), or None if this role
/// cannot advance an item in `current` status.
///
/// Recorder sets RECORDED; editor sets EDITED then READY_TO_POST; uploader
/// sets POSTED. No backward transitions exist on this path.
pub fn next_status(current: RecordingStatus, role: Role) -> Option<RecordingStatus> {
    match (current, role) {
        (RecordingStatus::NotRecorded, Role::Recorder) => Some(RecordingStatus::Recorded),
        (RecordingStatus::Recorded, Role::Editor) => Some(RecordingStatus::Edited),
        (RecordingStatus::Edited, Role::Editor) => Some(RecordingStatus::ReadyToPost),
        (RecordingStatus::ReadyToPost, Role::Uploader) => Some(RecordingStatus::Posted),
        _ => None,
    }
}

/// Payload fields that must be present for a transition into `target`
pub fn required_fields(target: RecordingStatus) -> &'static [&'static str] {
    match target {
        RecordingStatus::ReadyToPost => &["final_video_url"],
        RecordingStatus::Posted => &["posted_url", "posted_platform"],
        _ => &[],
    }
}
