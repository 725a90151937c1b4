//! Accept bid action - the single transition that ends a deal's auction.
//!
//! Accepting a bid atomically closes the deal, rejects every competing bid,
//! and materializes the connection that de-anonymizes the two parties. All
//! of it happens in one transaction holding the deal aggregate lock, so of
//! two concurrent acceptance attempts exactly one can succeed.

use serde::Serialize;
use tracing::info;

use crate::common::{Actor, BidId, CoreError};
use crate::domains::bids::models::{Bid, BidStatus};
use crate::domains::bids::permissions::can_decide_bid;
use crate::domains::connections::models::Connection;
use crate::domains::deals::models::{Deal, DealStatus};
use crate::kernel::{NotificationEvent, ServerDeps};

/// Result of a successful acceptance: the winning bid and the connection it
/// derived.
#[derive(Debug, Serialize)]
pub struct AcceptedBid {
    pub bid: Bid,
    pub connection: Connection,
}

pub async fn accept_bid(
    bid_id: BidId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<AcceptedBid, CoreError> {
    let mut tx = deps.db_pool.begin().await?;

    // Resolve the parent deal, then take the aggregate lock and re-read the
    // bid under it. Statuses read before the lock are stale by definition.
    let bid = Bid::find_by_id(bid_id, &mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    let deal = Deal::lock_by_id(bid.deal_id, &mut tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", bid.deal_id)))?;

    let bid = Bid::find_by_id(bid_id, &mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    can_decide_bid(&deal, actor)?;

    if deal.status != DealStatus::InNegotiation {
        return Err(CoreError::conflict(format!(
            "deal is {} and no bid can be accepted",
            deal.status
        )));
    }

    if !bid.status.is_active() {
        return Err(CoreError::conflict(format!(
            "bid is {} and can no longer be accepted",
            bid.status
        )));
    }

    let accepted = Bid::try_transition(bid_id, BidStatus::Accepted, &mut *tx)
        .await?
        .ok_or_else(|| CoreError::conflict("bid state changed, please refresh"))?;

    let rejected = Bid::reject_active_siblings(deal.id, bid_id, &mut *tx).await?;

    Deal::set_status(deal.id, DealStatus::Closed, &mut *tx).await?;

    let connection = Connection::create(
        deal.id,
        deal.requester_id,
        accepted.bidder_id,
        &accepted.offer,
        &mut *tx,
    )
    .await?;

    tx.commit().await?;

    deps.notifier
        .notify(
            accepted.bidder_id,
            NotificationEvent::BidAccepted {
                deal_id: deal.id,
                bid_id: accepted.id,
                connection_id: connection.id,
            },
        )
        .await;
    for loser in &rejected {
        deps.notifier
            .notify(
                loser.bidder_id,
                NotificationEvent::BidRejected {
                    deal_id: deal.id,
                    bid_id: loser.id,
                },
            )
            .await;
    }

    info!(
        "Bid {} accepted on deal {}; {} competing bid(s) rejected, connection {} created",
        accepted.id,
        deal.id,
        rejected.len(),
        connection.id
    );

    Ok(AcceptedBid {
        bid: accepted,
        connection,
    })
}
