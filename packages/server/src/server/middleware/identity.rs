//! Identity-extraction middleware.
//!
//! Credential validation happens upstream; the gateway forwards the
//! authenticated party as `x-party-id` / `x-party-role` headers. This
//! middleware turns them into an [`Actor`] request extension. Requests
//! without a valid pair continue unauthenticated and fail at the extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::common::{Actor, PartyId};

/// Authenticated party attached to the request.
#[derive(Clone, Debug)]
pub struct AuthParty(pub Actor);

/// Identity middleware: parses the gateway headers into an AuthParty
/// extension. Absent or malformed headers leave the request anonymous.
pub async fn identity_middleware(
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(actor) = extract_actor(&request) {
        debug!("Authenticated party: {} ({})", actor.id, actor.role);
        request.extensions_mut().insert(AuthParty(actor));
    } else {
        debug!("No valid party identity headers");
    }

    next.run(request).await
}

/// Extract the validated party from gateway headers.
fn extract_actor(request: &axum::http::Request<axum::body::Body>) -> Option<Actor> {
    let id = request.headers().get("x-party-id")?.to_str().ok()?;
    let role = request.headers().get("x-party-role")?.to_str().ok()?;

    let id = PartyId::parse(id).ok()?;
    let role = role.parse().ok()?;

    Some(Actor::new(id, role))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthParty
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthParty>().cloned().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "party identity required"})),
        ))
    }
}
