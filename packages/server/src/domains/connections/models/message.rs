use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{ConnectionId, MessageId, PartyId};

/// Message - one private message inside a connection.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub connection_id: ConnectionId,
    pub sender_id: PartyId,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Message Queries
// =============================================================================

impl Message {
    /// Append a message. New messages always start unread.
    pub async fn create<'e>(
        connection_id: ConnectionId,
        sender_id: PartyId,
        content: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, connection_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(MessageId::new())
        .bind(connection_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(executor)
        .await
    }

    /// All messages in a connection, oldest first. The id is a v7 tiebreak
    /// for identical timestamps.
    pub async fn find_by_connection(
        connection_id: ConnectionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE connection_id = $1 ORDER BY created_at, id",
        )
        .bind(connection_id)
        .fetch_all(pool)
        .await
    }

    /// Mark everything the reader did not author as read. Idempotent.
    ///
    /// Returns the number of messages flipped.
    pub async fn mark_read_for<'e>(
        connection_id: ConnectionId,
        reader_id: PartyId,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE connection_id = $1 AND sender_id <> $2 AND NOT is_read
            "#,
        )
        .bind(connection_id)
        .bind(reader_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
