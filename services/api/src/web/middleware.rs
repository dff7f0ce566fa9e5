//! services/api/src/web/middleware.rs
//!
//! Identity middleware for routes that change request state.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use profendorse_core::domain::Actor;
use tracing::warn;

/// Header carrying the authenticated professor or admin id, set by the
/// upstream identity provider.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Middleware that reads the caller's identity and exposes it as an `Actor`.
///
/// If present, inserts the `Actor` into request extensions for handlers to use.
/// If missing or blank, returns 401 Unauthorized. No credential check happens here.
pub async fn require_actor(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let actor_id = req
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            warn!("Rejected request without {} header", ACTOR_HEADER);
            StatusCode::UNAUTHORIZED
        })?
        .to_string();

    req.extensions_mut().insert(Actor::new(actor_id));
    Ok(next.run(req).await)
}
