//! Runtime configuration endpoint
//!
//! Serves the global feature flags clients poll for: incident banner state
//! and dispatch gating. Values live in the settings table so operators can
//! flip them without a restart.

use axum::{extract::State, Extension, Json};
use clipflow_common::api::ApiResponse;
use clipflow_common::db::models::Actor;
use clipflow_common::db::settings;
use serde_json::json;

use crate::claims::DEFAULT_CLAIM_TTL_MINUTES;
use crate::error::Result;
use crate::AppState;

/// GET /api/auth/runtime-config
pub async fn get_runtime_config(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
) -> Result<Json<ApiResponse>> {
    let incident_mode = settings::get_bool(&state.db, "incident_mode", false).await?;
    let incident_message = settings::get_string(&state.db, "incident_message", "").await?;
    let dispatch_requires_subscription =
        settings::get_bool(&state.db, "dispatch_requires_subscription", false).await?;
    let claim_ttl_minutes =
        settings::get_i64(&state.db, "claim_ttl_minutes", DEFAULT_CLAIM_TTL_MINUTES).await?;

    Ok(Json(ApiResponse::ok(json!({
        "incident_mode": incident_mode,
        "incident_message": incident_message,
        "dispatch_requires_subscription": dispatch_requires_subscription,
        "claim_ttl_minutes": claim_ttl_minutes,
    }))))
}
