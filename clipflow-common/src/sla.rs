//! SLA computation for queue items
//!
//! Pure functions over persisted fields plus a caller-supplied `now`; nothing
//! here reads the clock or caches state, so results are reproducible at any
//! time from the database row alone.
//!
//! Stage deadlines (documented in DESIGN.md):
//! - NOT_RECORDED: 4 hours to start recording
//! - RECORDED: 24 hours for the edit
//! - EDITED / READY_FOR_REVIEW: 8 hours for review
//! - READY_TO_POST: 4 hours to post
//! - everything else: 24 hours
//!
//! Rush priority halves the deadline. due_soon begins at 75% of the deadline.

use crate::workflow::RecordingStatus;
use serde::{Deserialize, Serialize};

/// Milliseconds per whole minute
const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;

/// Priority score bases per tier; age in minutes breaks ties within a tier.
const OVERDUE_BASE: i64 = 2_000_000;
const DUE_SOON_BASE: i64 = 1_000_000;

/// SLA tier for a queue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    OnTrack,
    DueSoon,
    Overdue,
}

impl SlaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaStatus::OnTrack => "on_track",
            SlaStatus::DueSoon => "due_soon",
            SlaStatus::Overdue => "overdue",
        }
    }
}

/// Item priority as stored on the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    Rush,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Rush => "rush",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Priority::Normal),
            "rush" => Some(Priority::Rush),
            _ => None,
        }
    }
}

/// Computed SLA fields attached to queue responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaSnapshot {
    pub sla_status: SlaStatus,
    /// Epoch ms when the current stage breaches its deadline
    pub sla_deadline_at: i64,
    /// Whole minutes since the last status change
    pub age_minutes_in_stage: i64,
    /// Queue ordering key: overdue first, then due_soon, then on_track,
    /// older items first within a tier
    pub priority_score: i64,
}

/// Deadline for a stage in milliseconds
fn stage_deadline_ms(status: RecordingStatus, priority: Priority) -> i64 {
    let base = match status {
        RecordingStatus::NotRecorded => 4 * HOUR_MS,
        RecordingStatus::Recorded => 24 * HOUR_MS,
        RecordingStatus::Edited | RecordingStatus::ReadyForReview => 8 * HOUR_MS,
        RecordingStatus::ReadyToPost => 4 * HOUR_MS,
        _ => 24 * HOUR_MS,
    };
    match priority {
        Priority::Normal => base,
        Priority::Rush => base / 2,
    }
}

/// Compute SLA fields for one item
///
/// `last_status_changed_at` and `now` are epoch milliseconds.
pub fn compute_sla(
    status: RecordingStatus,
    priority: Priority,
    last_status_changed_at: i64,
    now: i64,
) -> SlaSnapshot {
    let deadline_ms = stage_deadline_ms(status, priority);
    let sla_deadline_at = last_status_changed_at + deadline_ms;
    let age_ms = (now - last_status_changed_at).max(0);
    let age_minutes_in_stage = age_ms / MINUTE_MS;

    let sla_status = if age_ms >= deadline_ms {
        SlaStatus::Overdue
    } else if age_ms * 4 >= deadline_ms * 3 {
        SlaStatus::DueSoon
    } else {
        SlaStatus::OnTrack
    };

    let priority_score = match sla_status {
        SlaStatus::Overdue => OVERDUE_BASE + age_minutes_in_stage,
        SlaStatus::DueSoon => DUE_SOON_BASE + age_minutes_in_stage,
        SlaStatus::OnTrack => age_minutes_in_stage,
    };

    SlaSnapshot {
        sla_status,
        sla_deadline_at,
        age_minutes_in_stage,
        priority_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn fresh_item_is_on_track() {
        let snap = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0);
        assert_eq!(snap.sla_status, SlaStatus::OnTrack);
        assert_eq!(snap.age_minutes_in_stage, 0);
        assert_eq!(snap.priority_score, 0);
        assert_eq!(snap.sla_deadline_at, T0 + 4 * HOUR_MS);
    }

    #[test]
    fn due_soon_at_three_quarters_of_deadline() {
        // 3h into a 4h stage
        let now = T0 + 3 * HOUR_MS;
        let snap = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, now);
        assert_eq!(snap.sla_status, SlaStatus::DueSoon);
        assert_eq!(snap.age_minutes_in_stage, 180);

        // just under the boundary
        let snap = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, now - 1);
        assert_eq!(snap.sla_status, SlaStatus::OnTrack);
    }

    #[test]
    fn overdue_at_deadline() {
        let now = T0 + 4 * HOUR_MS;
        let snap = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, now);
        assert_eq!(snap.sla_status, SlaStatus::Overdue);
    }

    #[test]
    fn rush_halves_the_deadline() {
        let now = T0 + 2 * HOUR_MS;
        let normal = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, now);
        let rush = compute_sla(RecordingStatus::NotRecorded, Priority::Rush, T0, now);
        assert_eq!(normal.sla_status, SlaStatus::OnTrack);
        assert_eq!(rush.sla_status, SlaStatus::Overdue);
        assert_eq!(rush.sla_deadline_at, T0 + 2 * HOUR_MS);
    }

    #[test]
    fn edit_stage_uses_24_hour_deadline() {
        let now = T0 + 23 * HOUR_MS;
        let snap = compute_sla(RecordingStatus::Recorded, Priority::Normal, T0, now);
        assert_eq!(snap.sla_status, SlaStatus::DueSoon);
        assert_eq!(snap.sla_deadline_at, T0 + 24 * HOUR_MS);
    }

    #[test]
    fn priority_score_orders_tiers_then_age() {
        let overdue = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 + 5 * HOUR_MS);
        let due_soon = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 + 3 * HOUR_MS);
        let on_track = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 + HOUR_MS);
        assert!(overdue.priority_score > due_soon.priority_score);
        assert!(due_soon.priority_score > on_track.priority_score);

        // within one tier, older sorts higher
        let older = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 + 2 * HOUR_MS);
        let newer = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 + HOUR_MS);
        assert!(older.priority_score > newer.priority_score);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let a = compute_sla(RecordingStatus::Recorded, Priority::Normal, T0, T0 + 123_456);
        let b = compute_sla(RecordingStatus::Recorded, Priority::Normal, T0, T0 + 123_456);
        assert_eq!(a, b);
    }

    #[test]
    fn clock_skew_clamps_age_to_zero() {
        // last_status_changed_at in the future relative to now
        let snap = compute_sla(RecordingStatus::NotRecorded, Priority::Normal, T0, T0 - MINUTE_MS);
        assert_eq!(snap.age_minutes_in_stage, 0);
        assert_eq!(snap.sla_status, SlaStatus::OnTrack);
    }
}
