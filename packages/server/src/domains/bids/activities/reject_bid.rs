//! Reject bid action - the requester declines a live bid.

use tracing::info;

use crate::common::{Actor, BidId, CoreError};
use crate::domains::bids::models::{Bid, BidStatus};
use crate::domains::bids::permissions::can_decide_bid;
use crate::domains::deals::models::Deal;
use crate::kernel::{NotificationEvent, ServerDeps};

/// Reject a pending or countered bid. The deal stays open to its other
/// bidders.
pub async fn reject_bid(bid_id: BidId, actor: &Actor, deps: &ServerDeps) -> Result<Bid, CoreError> {
    let bid = Bid::find_by_id(bid_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    let deal = Deal::find_by_id(bid.deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", bid.deal_id)))?;

    can_decide_bid(&deal, actor)?;

    if !bid.status.is_active() {
        return Err(CoreError::conflict(format!(
            "bid is {} and can no longer be rejected",
            bid.status
        )));
    }

    let rejected = Bid::try_transition(bid_id, BidStatus::Rejected, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::conflict("bid state changed, please refresh"))?;

    deps.notifier
        .notify(
            rejected.bidder_id,
            NotificationEvent::BidRejected {
                deal_id: deal.id,
                bid_id: rejected.id,
            },
        )
        .await;

    info!("Bid {} rejected by requester {}", bid_id, actor.id);

    Ok(rejected)
}
