//! Send message action - appends a private message to a connection.

use tracing::info;

use crate::common::{Actor, ConnectionId, CoreError};
use crate::domains::connections::models::{Connection, Message};
use crate::domains::connections::permissions::ensure_party;
use crate::kernel::{NotificationEvent, ServerDeps};

pub async fn send_message(
    connection_id: ConnectionId,
    actor: &Actor,
    content: &str,
    deps: &ServerDeps,
) -> Result<Message, CoreError> {
    let connection = Connection::find_by_id(connection_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("connection {}", connection_id)))?;

    ensure_party(&connection, actor)?;

    let content = content.trim();
    if content.is_empty() {
        return Err(CoreError::validation("message content must not be empty"));
    }

    let message = Message::create(connection_id, actor.id, content, &deps.db_pool).await?;

    deps.notifier
        .notify(
            connection.counterparty_of(actor.id),
            NotificationEvent::MessageSent {
                connection_id,
                message_id: message.id,
            },
        )
        .await;

    info!(
        "Message {} sent on connection {} by {}",
        message.id, connection_id, actor.id
    );

    Ok(message)
}
