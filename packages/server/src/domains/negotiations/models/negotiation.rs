use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgExecutor;

use crate::common::{BidId, NegotiationId, PartyId};
use crate::domains::deals::models::Terms;

/// Negotiation - one counter-offer round on a bid.
///
/// Rounds are append-only and numbered from 1; the original bid counts as
/// round 0 (proposed by the bidder) and is not stored here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Negotiation {
    pub id: NegotiationId,
    pub bid_id: BidId,
    pub proposed_by: PartyId,
    pub round: i32,
    pub terms: Json<Terms>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Negotiation Queries
// =============================================================================

impl Negotiation {
    /// Append a round. Callers compute the round number under the deal
    /// aggregate lock; the (bid_id, round) unique constraint is the backstop.
    pub async fn create<'e>(
        bid_id: BidId,
        proposed_by: PartyId,
        round: i32,
        terms: &Terms,
        message: Option<&str>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Negotiation>(
            r#"
            INSERT INTO negotiations (id, bid_id, proposed_by, round, terms, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(NegotiationId::new())
        .bind(bid_id)
        .bind(proposed_by)
        .bind(round)
        .bind(Json(terms))
        .bind(message)
        .fetch_one(executor)
        .await
    }

    /// All rounds for a bid, oldest first.
    pub async fn find_by_bid<'e>(
        bid_id: BidId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Negotiation>(
            "SELECT * FROM negotiations WHERE bid_id = $1 ORDER BY round",
        )
        .bind(bid_id)
        .fetch_all(executor)
        .await
    }

    /// The most recent round for a bid, if any.
    pub async fn last_for_bid<'e>(
        bid_id: BidId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Negotiation>(
            "SELECT * FROM negotiations WHERE bid_id = $1 ORDER BY round DESC LIMIT 1",
        )
        .bind(bid_id)
        .fetch_optional(executor)
        .await
    }
}
