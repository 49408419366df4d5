//! Queue store: read and create paths for work items
//!
//! All claim/status mutation goes through the claim manager, dispatcher, or
//! transition validator; this module only inserts new items and reads.

use crate::error::Result;
use clipflow_common::db::models::Video;
use clipflow_common::sla::Priority;
use clipflow_common::workflow::RecordingStatus;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Fields accepted when creating a work item
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub priority: Priority,
    /// Script snapshot locked at creation; read-only from then on
    pub script_locked_text: Option<String>,
}

/// Claim-state filter for queue listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimedFilter {
    /// Only items with a live (non-expired) claim
    Claimed,
    /// Only items with no claim or an expired one
    Unclaimed,
    #[default]
    Any,
}

impl ClaimedFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "claimed" => Some(ClaimedFilter::Claimed),
            "unclaimed" => Some(ClaimedFilter::Unclaimed),
            "any" => Some(ClaimedFilter::Any),
            _ => None,
        }
    }
}

/// Sort order for queue listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueSort {
    /// Highest priority_score first (overdue, then due_soon, then on_track)
    #[default]
    Priority,
    /// Oldest in stage first
    Age,
}

impl QueueSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "priority" => Some(QueueSort::Priority),
            "age" => Some(QueueSort::Age),
            _ => None,
        }
    }
}

/// Filters for a queue listing
#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    pub recording_status: Option<RecordingStatus>,
    pub claimed: ClaimedFilter,
    pub claimed_by: Option<String>,
    pub sort: QueueSort,
    pub limit: i64,
}

/// Insert a new work item at NOT_RECORDED
pub async fn insert_video(pool: &SqlitePool, new: &NewVideo, now: i64) -> Result<Video> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO videos (id, title, recording_status, priority, script_locked_text,
                            last_status_changed_at, created_at, updated_at)
        VALUES (?, ?, 'NOT_RECORDED', ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.title)
    .bind(new.priority.as_str())
    .bind(&new.script_locked_text)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let video = get_video(pool, &id)
        .await?
        .ok_or_else(|| crate::error::Error::NotFound(format!("video {}", id)))?;
    Ok(video)
}

/// Fetch a single work item
pub async fn get_video(pool: &SqlitePool, id: &str) -> Result<Option<Video>> {
    let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(video)
}

/// List queue items matching `filter`, ordered per `filter.sort`
///
/// Priority ordering uses the computed priority_score, which depends on
/// stage-specific thresholds, so matching rows are fetched and sorted here
/// rather than in SQL. Queue depths are small (bounded by active production),
/// so this stays cheap.
pub async fn list_queue(pool: &SqlitePool, filter: &QueueFilter, now: i64) -> Result<Vec<Video>> {
    let mut sql = String::from("SELECT * FROM videos WHERE 1=1");
    if filter.recording_status.is_some() {
        sql.push_str(" AND recording_status = ?");
    }
    if filter.claimed_by.is_some() {
        sql.push_str(" AND claimed_by = ?");
    }
    match filter.claimed {
        ClaimedFilter::Claimed => {
            sql.push_str(" AND claimed_by IS NOT NULL AND claim_expires_at > ?");
        }
        ClaimedFilter::Unclaimed => {
            sql.push_str(" AND (claimed_by IS NULL OR claim_expires_at <= ?)");
        }
        ClaimedFilter::Any => {}
    }
    sql.push_str(" ORDER BY last_status_changed_at ASC");

    let mut query = sqlx::query_as::<_, Video>(&sql);
    if let Some(status) = filter.recording_status {
        query = query.bind(status.as_str());
    }
    if let Some(claimed_by) = &filter.claimed_by {
        query = query.bind(claimed_by);
    }
    if filter.claimed != ClaimedFilter::Any {
        query = query.bind(now);
    }

    let mut videos = query.fetch_all(pool).await?;

    if filter.sort == QueueSort::Priority {
        videos.sort_by_key(|v| {
            std::cmp::Reverse(v.sla(now).map(|s| s.priority_score).unwrap_or(0))
        });
    }

    let limit = filter.limit.max(1) as usize;
    videos.truncate(limit);
    Ok(videos)
}
