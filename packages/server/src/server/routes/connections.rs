//! Connection and messaging routes.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::ConnectionId;
use crate::domains::connections::activities::{
    get_connection, list_connections, mark_read, send_message, ConnectionView,
};
use crate::domains::connections::models::{ConnectionSummary, Message};
use crate::server::app::AppState;
use crate::server::middleware::AuthParty;
use crate::server::routes::error::ApiError;

pub async fn list_connections_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
) -> Result<Json<Vec<ConnectionSummary>>, ApiError> {
    let connections = list_connections(&actor, &state.deps).await?;
    Ok(Json(connections))
}

pub async fn get_connection_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(connection_id): Path<ConnectionId>,
) -> Result<Json<ConnectionView>, ApiError> {
    let view = get_connection(connection_id, &actor, &state.deps).await?;
    Ok(Json(view))
}

/// Body for sending a message.
#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub content: String,
}

pub async fn send_message_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(connection_id): Path<ConnectionId>,
    Json(body): Json<NewMessage>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = send_message(connection_id, &actor, &body.content, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub marked_read: u64,
}

pub async fn mark_read_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(connection_id): Path<ConnectionId>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let marked_read = mark_read(connection_id, &actor, &state.deps).await?;
    Ok(Json(MarkReadResponse { marked_read }))
}
