//! Read-side negotiation history for a bid.

use crate::common::{Actor, BidId, CoreError};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::Deal;
use crate::domains::negotiations::models::Negotiation;
use crate::domains::negotiations::permissions::can_negotiate;
use crate::kernel::ServerDeps;

/// Rounds on a bid, oldest first. Participants only.
pub async fn list_rounds(
    bid_id: BidId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Vec<Negotiation>, CoreError> {
    let bid = Bid::find_by_id(bid_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    let deal = Deal::find_by_id(bid.deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", bid.deal_id)))?;

    can_negotiate(&deal, &bid, actor)?;

    let rounds = Negotiation::find_by_bid(bid_id, &deps.db_pool).await?;
    Ok(rounds)
}
