//! Read-side connection listing for a party.

use crate::common::{Actor, CoreError};
use crate::domains::connections::models::{Connection, ConnectionSummary};
use crate::kernel::ServerDeps;

/// All connections the actor is named on, newest first, with message and
/// unread counts from the actor's point of view.
pub async fn list_connections(
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Vec<ConnectionSummary>, CoreError> {
    let connections = Connection::find_for_party(actor.id, &deps.db_pool).await?;
    Ok(connections)
}
