//! Status transition endpoint

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use clipflow_common::api::ApiResponse;
use clipflow_common::db::models::Actor;
use clipflow_common::time::now_ms;
use clipflow_common::workflow::{RecordingStatus, Role};
use serde::Deserialize;

use crate::api::queue::video_with_sla;
use crate::error::{Error, Result};
use crate::transitions::{self, TransitionPayload};
use crate::AppState;

/// Request body for PUT /api/videos/:id/execution
#[derive(Debug, Deserialize)]
pub struct ExecutionRequest {
    pub target_status: String,
    /// Role to act as; defaults to the actor's own role. Admins must supply it.
    pub role: Option<String>,
    #[serde(flatten)]
    pub payload: TransitionPayload,
}

/// PUT /api/videos/:id/execution
///
/// Submits a status transition with the role-specific payload. The caller
/// must hold a live claim for the item; the target must be the single legal
/// next status; required fields must be present. Nothing is mutated on
/// failure.
pub async fn submit_execution(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(body): Json<ExecutionRequest>,
) -> Result<Json<ApiResponse>> {
    let role = match &body.role {
        Some(r) => Role::parse(r)
            .ok_or_else(|| Error::BadRequest(format!("Unknown role: {}", r)))?,
        None => actor
            .worker_role()
            .ok_or_else(|| Error::BadRequest("Admin requests must specify a role".to_string()))?,
    };
    if !actor.can_act_as(role) {
        return Err(Error::RoleMismatch(format!(
            "Actor role '{}' cannot act as {}",
            actor.role, role
        )));
    }

    let target = RecordingStatus::parse(&body.target_status).ok_or_else(|| {
        Error::BadRequest(format!("Unknown target_status: {}", body.target_status))
    })?;

    let now = now_ms();
    let updated =
        transitions::submit_transition(&state.db, &id, &actor.id, role, target, &body.payload, now)
            .await?;

    Ok(Json(ApiResponse::ok(video_with_sla(&updated, now)?)))
}
