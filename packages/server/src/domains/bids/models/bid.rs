use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::common::{BidId, DealId, PartyId};
use crate::domains::deals::models::Terms;

/// Bid status state machine.
///
/// pending ⇄ countered while negotiation is live; accepted, rejected, and
/// withdrawn are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Countered,
    Accepted,
    Rejected,
    Withdrawn,
}

impl BidStatus {
    /// Active bids can still be negotiated, withdrawn, accepted, or rejected.
    pub fn is_active(&self) -> bool {
        matches!(self, BidStatus::Pending | BidStatus::Countered)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidStatus::Pending => write!(f, "pending"),
            BidStatus::Countered => write!(f, "countered"),
            BidStatus::Accepted => write!(f, "accepted"),
            BidStatus::Rejected => write!(f, "rejected"),
            BidStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for BidStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(BidStatus::Pending),
            "countered" => Ok(BidStatus::Countered),
            "accepted" => Ok(BidStatus::Accepted),
            "rejected" => Ok(BidStatus::Rejected),
            "withdrawn" => Ok(BidStatus::Withdrawn),
            _ => Err(anyhow::anyhow!("Invalid bid status: {}", s)),
        }
    }
}

/// Bid - a bidder's offer against a deal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: BidId,
    pub deal_id: DealId,
    pub bidder_id: PartyId,
    /// Current offered terms; negotiation rounds replace this snapshot.
    pub offer: Json<Terms>,
    pub message: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting a bid.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBid {
    pub deal_id: DealId,
    pub offer: Terms,
    pub message: Option<String>,
}

// =============================================================================
// Bid Queries
// =============================================================================

impl Bid {
    /// Insert a new pending bid.
    pub async fn create<'e>(
        deal_id: DealId,
        bidder_id: PartyId,
        offer: &Terms,
        message: Option<&str>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (id, deal_id, bidder_id, offer, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(BidId::new())
        .bind(deal_id)
        .bind(bidder_id)
        .bind(Json(offer))
        .bind(message)
        .fetch_one(executor)
        .await
    }

    /// Find bid by ID
    pub async fn find_by_id<'e>(
        id: BidId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find all bids on a deal, newest first.
    pub async fn find_by_deal(deal_id: DealId, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE deal_id = $1 ORDER BY created_at DESC")
            .bind(deal_id)
            .fetch_all(pool)
            .await
    }

    /// Find a bidder's bids on a specific deal, newest first.
    pub async fn find_by_deal_and_bidder(
        deal_id: DealId,
        bidder_id: PartyId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            "SELECT * FROM bids WHERE deal_id = $1 AND bidder_id = $2 ORDER BY created_at DESC",
        )
        .bind(deal_id)
        .bind(bidder_id)
        .fetch_all(pool)
        .await
    }

    /// Find all bids placed by a bidder across deals, newest first.
    pub async fn find_by_bidder(bidder_id: PartyId, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE bidder_id = $1 ORDER BY created_at DESC")
            .bind(bidder_id)
            .fetch_all(pool)
            .await
    }

    /// Find a bidder's live (pending or countered) bid on a deal, if any.
    pub async fn find_active_for_bidder<'e>(
        deal_id: DealId,
        bidder_id: PartyId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            SELECT * FROM bids
            WHERE deal_id = $1 AND bidder_id = $2 AND status IN ('pending', 'countered')
            "#,
        )
        .bind(deal_id)
        .bind(bidder_id)
        .fetch_optional(executor)
        .await
    }

    /// The accepted bid on a deal, if one exists.
    pub async fn find_accepted_for_deal<'e>(
        deal_id: DealId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE deal_id = $1 AND status = 'accepted'")
            .bind(deal_id)
            .fetch_optional(executor)
            .await
    }

    /// Count bids that block deal edits (anything not withdrawn).
    pub async fn count_non_withdrawn<'e>(
        deal_id: DealId,
        executor: impl PgExecutor<'e>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bids WHERE deal_id = $1 AND status <> 'withdrawn'",
        )
        .bind(deal_id)
        .fetch_one(executor)
        .await
    }

    /// Transition a bid out of an active status.
    ///
    /// The status guard makes the transition race-safe: returns `None` when
    /// the bid is no longer pending/countered, and the caller maps that to a
    /// conflict.
    pub async fn try_transition<'e>(
        id: BidId,
        to: BidStatus,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            UPDATE bids
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'countered')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to)
        .fetch_optional(executor)
        .await
    }

    /// Reject every live bid on a deal except the given one.
    ///
    /// Returns the bids that were flipped, for notification fan-out.
    pub async fn reject_active_siblings<'e>(
        deal_id: DealId,
        except: BidId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            UPDATE bids
            SET status = 'rejected', updated_at = NOW()
            WHERE deal_id = $1 AND id <> $2 AND status IN ('pending', 'countered')
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .bind(except)
        .fetch_all(executor)
        .await
    }

    /// Reject every live bid on a deal (cancellation cascade).
    pub async fn reject_all_active<'e>(
        deal_id: DealId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            UPDATE bids
            SET status = 'rejected', updated_at = NOW()
            WHERE deal_id = $1 AND status IN ('pending', 'countered')
            RETURNING *
            "#,
        )
        .bind(deal_id)
        .fetch_all(executor)
        .await
    }

    /// Replace the current offer with a negotiation snapshot and mark the
    /// bid countered.
    pub async fn update_offer<'e>(
        id: BidId,
        offer: &Terms,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            UPDATE bids
            SET offer = $2, status = 'countered', updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(offer))
        .fetch_one(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_terminal_partition() {
        assert!(BidStatus::Pending.is_active());
        assert!(BidStatus::Countered.is_active());
        assert!(BidStatus::Accepted.is_terminal());
        assert!(BidStatus::Rejected.is_terminal());
        assert!(BidStatus::Withdrawn.is_terminal());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            BidStatus::Pending,
            BidStatus::Countered,
            BidStatus::Accepted,
            BidStatus::Rejected,
            BidStatus::Withdrawn,
        ] {
            let parsed: BidStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
