use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::common::{ConnectionId, DealId, PartyId};
use crate::domains::deals::models::Terms;

/// Connection - the de-anonymized relationship derived from an accepted bid.
///
/// Created exactly once per deal (the deal_id column is unique) and immutable
/// afterwards; message counts are derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Connection {
    pub id: ConnectionId,
    pub deal_id: DealId,
    pub requester_id: PartyId,
    pub bidder_id: PartyId,
    /// Snapshot of the accepted offer at acceptance time.
    pub final_terms: Json<Terms>,
    pub created_at: DateTime<Utc>,
}

/// A party's connection with message aggregates for list views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConnectionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub connection: Connection,
    pub message_count: i64,
    /// Messages from the counterparty the viewing party has not read yet.
    pub unread_count: i64,
}

impl Connection {
    /// Whether the given party is one of the two named on this connection.
    pub fn is_party(&self, party_id: PartyId) -> bool {
        self.requester_id == party_id || self.bidder_id == party_id
    }

    /// The other named party.
    pub fn counterparty_of(&self, party_id: PartyId) -> PartyId {
        if party_id == self.requester_id {
            self.bidder_id
        } else {
            self.requester_id
        }
    }
}

// =============================================================================
// Connection Queries
// =============================================================================

impl Connection {
    /// Materialize the connection for an accepted bid.
    pub async fn create<'e>(
        deal_id: DealId,
        requester_id: PartyId,
        bidder_id: PartyId,
        final_terms: &Json<Terms>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Connection>(
            r#"
            INSERT INTO connections (id, deal_id, requester_id, bidder_id, final_terms)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ConnectionId::new())
        .bind(deal_id)
        .bind(requester_id)
        .bind(bidder_id)
        .bind(final_terms)
        .fetch_one(executor)
        .await
    }

    /// Find connection by ID
    pub async fn find_by_id<'e>(
        id: ConnectionId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All connections a party is named on, newest first, with message
    /// aggregates computed from the party's point of view.
    pub async fn find_for_party(
        party_id: PartyId,
        pool: &PgPool,
    ) -> Result<Vec<ConnectionSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConnectionSummary>(
            r#"
            SELECT c.*,
                (SELECT COUNT(*) FROM messages m WHERE m.connection_id = c.id) AS message_count,
                (SELECT COUNT(*) FROM messages m
                 WHERE m.connection_id = c.id AND m.sender_id <> $1 AND NOT m.is_read) AS unread_count
            FROM connections c
            WHERE c.requester_id = $1 OR c.bidder_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(party_id)
        .fetch_all(pool)
        .await
    }
}
