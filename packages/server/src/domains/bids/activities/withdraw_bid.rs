//! Withdraw bid action - the bidder retracts a live bid.

use tracing::info;

use crate::common::{Actor, BidId, CoreError};
use crate::domains::bids::models::{Bid, BidStatus};
use crate::domains::bids::permissions::can_withdraw_bid;
use crate::kernel::ServerDeps;

/// Withdraw a pending or countered bid. Terminal; the bidder may submit a
/// fresh bid on the same deal afterwards.
pub async fn withdraw_bid(
    bid_id: BidId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Bid, CoreError> {
    let bid = Bid::find_by_id(bid_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    can_withdraw_bid(&bid, actor)?;

    if !bid.status.is_active() {
        return Err(CoreError::conflict(format!(
            "bid is {} and can no longer be withdrawn",
            bid.status
        )));
    }

    // Guarded transition: loses cleanly if an acceptance or rejection
    // committed since the read above.
    let withdrawn = Bid::try_transition(bid_id, BidStatus::Withdrawn, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::conflict("bid state changed, please refresh"))?;

    info!("Bid {} withdrawn by bidder {}", bid_id, actor.id);

    Ok(withdrawn)
}
