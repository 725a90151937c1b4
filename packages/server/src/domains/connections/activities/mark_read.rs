//! Mark read action - flips the counterparty's messages to read.

use tracing::debug;

use crate::common::{Actor, ConnectionId, CoreError};
use crate::domains::connections::models::{Connection, Message};
use crate::domains::connections::permissions::ensure_party;
use crate::kernel::ServerDeps;

/// Mark every message the actor did not author as read. Idempotent: a second
/// call is a no-op.
///
/// Returns the number of messages flipped.
pub async fn mark_read(
    connection_id: ConnectionId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<u64, CoreError> {
    let connection = Connection::find_by_id(connection_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("connection {}", connection_id)))?;

    ensure_party(&connection, actor)?;

    let flipped = Message::mark_read_for(connection_id, actor.id, &deps.db_pool).await?;

    debug!(
        "Marked {} message(s) read on connection {} for {}",
        flipped, connection_id, actor.id
    );

    Ok(flipped)
}
