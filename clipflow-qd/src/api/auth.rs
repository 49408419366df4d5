//! Authentication middleware for clipflow-qd
//!
//! Resolves the bearer API key into a request-scoped actor context (identity,
//! role, plan) exactly once per request, and attaches it as an extension for
//! downstream handlers. There is no ambient session state.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use clipflow_common::db::models::Actor;

use crate::error::{Error, Result};
use crate::AppState;

/// Authentication middleware
///
/// Expects `Authorization: Bearer <api_key>` matching a row in the actors
/// table. Returns 401 AUTHENTICATION_REQUIRED otherwise.
///
/// **Note:** Applied to protected routes only; /health bypasses this.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::AuthenticationRequired)?
        .to_string();

    let actor = sqlx::query_as::<_, Actor>("SELECT * FROM actors WHERE api_key = ?")
        .bind(&token)
        .fetch_optional(&state.db)
        .await?
        .ok_or(Error::AuthenticationRequired)?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}
