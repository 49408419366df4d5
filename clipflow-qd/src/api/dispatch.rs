//! Dispatch and my-active endpoints
//!
//! Both responses may carry a top-level `previous_expired` flag alongside
//! the envelope so the client can tell the user an assignment lapsed before
//! showing new work.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use clipflow_common::db::models::Actor;
use clipflow_common::time::now_ms;
use clipflow_common::workflow::Role;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatch;
use crate::error::{Error, Result};
use crate::AppState;

/// Request body for POST /api/videos/dispatch
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub role: String,
}

/// Query parameters for GET /api/videos/my-active
#[derive(Debug, Deserialize)]
pub struct MyActiveQuery {
    pub role: String,
}

fn resolve_role(actor: &Actor, requested: &str) -> Result<Role> {
    let role = Role::parse(requested)
        .ok_or_else(|| Error::BadRequest(format!("Unknown role: {}", requested)))?;
    if !actor.can_act_as(role) {
        return Err(Error::RoleMismatch(format!(
            "Actor role '{}' cannot act as {}",
            actor.role, role
        )));
    }
    Ok(role)
}

/// POST /api/videos/dispatch
///
/// Auto-assigns the next eligible item. Re-entrant: an existing unexpired
/// assignment is returned unchanged. Fails with NO_WORK_AVAILABLE or, when
/// plan gating is on, SUBSCRIPTION_REQUIRED (checked before selection).
pub async fn dispatch_video(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<DispatchRequest>,
) -> Result<Json<Value>> {
    let role = resolve_role(&actor, &body.role)?;

    let result = dispatch::dispatch_next(&state.db, &actor, role, now_ms()).await?;

    let mut envelope = json!({
        "ok": true,
        "data": result.assignment,
    });
    if result.previous_expired {
        envelope["previous_expired"] = Value::Bool(true);
    }
    Ok(Json(envelope))
}

/// GET /api/videos/my-active?role=R
///
/// Returns the caller's current assignment for the role, or data:null. An
/// expired assignment is implicitly released and flagged `previous_expired`.
pub async fn get_my_active(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<MyActiveQuery>,
) -> Result<Json<Value>> {
    let role = resolve_role(&actor, &query.role)?;

    let (assignment, previous_expired) =
        dispatch::active_assignment(&state.db, &actor.id, role, now_ms()).await?;

    let mut envelope = json!({
        "ok": true,
        "data": assignment,
    });
    if previous_expired {
        envelope["previous_expired"] = Value::Bool(true);
    }
    Ok(Json(envelope))
}
