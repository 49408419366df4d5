//! Claim and release endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use clipflow_common::api::ApiResponse;
use clipflow_common::db::models::Actor;
use clipflow_common::time::now_ms;
use clipflow_common::workflow::Role;
use serde::Deserialize;

use crate::claims;
use crate::error::{Error, Result};
use crate::AppState;

/// Request body for POST /api/videos/:id/claim
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub role: String,
}

/// POST /api/videos/:id/claim
///
/// Grants an exclusive time-boxed claim to the caller. Contention loss
/// surfaces as 409 ALREADY_CLAIMED with `details.claimed_by`.
pub async fn claim_video(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(body): Json<ClaimRequest>,
) -> Result<Json<ApiResponse>> {
    let role = Role::parse(&body.role)
        .ok_or_else(|| Error::BadRequest(format!("Unknown role: {}", body.role)))?;
    if !actor.can_act_as(role) {
        return Err(Error::RoleMismatch(format!(
            "Actor role '{}' cannot claim as {}",
            actor.role, role
        )));
    }

    claims::claim(&state.db, &id, &actor.id, role, now_ms()).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

/// POST /api/videos/:id/release
///
/// Releases the caller's claim. Idempotent: releasing an item the caller
/// does not hold is a no-op success.
pub async fn release_video(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>> {
    claims::release(&state.db, &id, &actor.id).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
