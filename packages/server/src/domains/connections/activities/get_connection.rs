//! Read-side connection view: the connection, its messages, and the deal and
//! bid it originated from.

use serde::Serialize;

use crate::common::{Actor, ConnectionId, CoreError};
use crate::domains::bids::models::Bid;
use crate::domains::connections::models::{Connection, Message};
use crate::domains::connections::permissions::ensure_party;
use crate::domains::deals::models::Deal;
use crate::kernel::ServerDeps;

/// Everything a party sees when opening a connection.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
    pub connection: Connection,
    pub deal: Deal,
    pub accepted_bid: Bid,
    pub messages: Vec<Message>,
}

pub async fn get_connection(
    connection_id: ConnectionId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<ConnectionView, CoreError> {
    let connection = Connection::find_by_id(connection_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("connection {}", connection_id)))?;

    ensure_party(&connection, actor)?;

    let deal = Deal::find_by_id(connection.deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", connection.deal_id)))?;

    let accepted_bid = Bid::find_accepted_for_deal(connection.deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            CoreError::not_found(format!("accepted bid for deal {}", connection.deal_id))
        })?;

    let messages = Message::find_by_connection(connection_id, &deps.db_pool).await?;

    Ok(ConnectionView {
        connection,
        deal,
        accepted_bid,
        messages,
    })
}
