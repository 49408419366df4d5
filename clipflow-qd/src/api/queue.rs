//! Queue listing and work item endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use clipflow_common::api::ApiResponse;
use clipflow_common::db::models::{Actor, Video};
use clipflow_common::db::settings;
use clipflow_common::sla::Priority;
use clipflow_common::time::now_ms;
use clipflow_common::workflow::RecordingStatus;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::store::{self, ClaimedFilter, NewVideo, QueueFilter, QueueSort};
use crate::AppState;

/// Fallback page size when the setting is unreadable
const DEFAULT_QUEUE_LIMIT: i64 = 50;

/// Query parameters for GET /api/videos/queue
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub claimed: Option<String>,
    pub claimed_by: Option<String>,
    pub recording_status: Option<String>,
}

/// Request body for POST /api/videos
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub priority: Option<String>,
    pub script_locked_text: Option<String>,
}

/// Serialize a video row together with its computed SLA fields
pub fn video_with_sla(video: &Video, now: i64) -> Result<Value> {
    let mut value = serde_json::to_value(video)?;
    if let (Some(obj), Some(sla)) = (value.as_object_mut(), video.sla(now)) {
        obj.insert("sla_status".into(), Value::from(sla.sla_status.as_str()));
        obj.insert("sla_deadline_at".into(), Value::from(sla.sla_deadline_at));
        obj.insert(
            "age_minutes_in_stage".into(),
            Value::from(sla.age_minutes_in_stage),
        );
        obj.insert("priority_score".into(), Value::from(sla.priority_score));
    }
    Ok(value)
}

/// GET /api/videos/queue
///
/// Lists queue items with computed SLA fields. Filters: `recording_status`,
/// `claimed` (claimed|unclaimed|any, expiry-aware), `claimed_by`, `limit`,
/// `sort` (priority|age).
pub async fn list_queue(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<ApiResponse>> {
    let now = now_ms();

    let recording_status = match &query.recording_status {
        Some(s) => Some(
            RecordingStatus::parse(s)
                .ok_or_else(|| Error::BadRequest(format!("Unknown recording_status: {}", s)))?,
        ),
        None => None,
    };
    let claimed = match &query.claimed {
        Some(s) => ClaimedFilter::parse(s)
            .ok_or_else(|| Error::BadRequest(format!("Unknown claimed filter: {}", s)))?,
        None => ClaimedFilter::Any,
    };
    let sort = match &query.sort {
        Some(s) => QueueSort::parse(s)
            .ok_or_else(|| Error::BadRequest(format!("Unknown sort: {}", s)))?,
        None => QueueSort::Priority,
    };

    let default_limit =
        settings::get_i64(&state.db, "queue_default_limit", DEFAULT_QUEUE_LIMIT).await?;
    let limit = query.limit.unwrap_or(default_limit).clamp(1, 500);

    let filter = QueueFilter {
        recording_status,
        claimed,
        claimed_by: query.claimed_by.clone(),
        sort,
        limit,
    };

    let videos = store::list_queue(&state.db, &filter, now).await?;
    let items = videos
        .iter()
        .map(|v| video_with_sla(v, now))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(ApiResponse::ok(Value::Array(items))))
}

/// POST /api/videos
///
/// Creates a work item at NOT_RECORDED with an optional locked script
/// snapshot. Admin only; worker roles never create items.
pub async fn create_video(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<CreateVideoRequest>,
) -> Result<Json<ApiResponse>> {
    if !actor.is_admin() {
        return Err(Error::Forbidden("Only admins may create work items".to_string()));
    }
    if body.title.trim().is_empty() {
        return Err(Error::missing_field("title"));
    }
    let priority = match &body.priority {
        Some(p) => Priority::parse(p)
            .ok_or_else(|| Error::BadRequest(format!("Unknown priority: {}", p)))?,
        None => Priority::Normal,
    };

    let now = now_ms();
    let new = NewVideo {
        title: body.title.trim().to_string(),
        priority,
        script_locked_text: body.script_locked_text.clone(),
    };
    let video = store::insert_video(&state.db, &new, now).await?;

    Ok(Json(ApiResponse::ok(video_with_sla(&video, now)?)))
}

/// GET /api/videos/:id
pub async fn get_video(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>> {
    let now = now_ms();
    let video = store::get_video(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("video {}", id)))?;

    Ok(Json(ApiResponse::ok(video_with_sla(&video, now)?)))
}
