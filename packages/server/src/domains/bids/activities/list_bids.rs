//! Read-side bid queries with participant-scoped visibility.

use crate::common::{Actor, CoreError, DealId, PartyRole};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::Deal;
use crate::kernel::ServerDeps;

/// Bids on a deal.
///
/// The owning requester sees every bid; a bidder sees only their own.
pub async fn list_bids_for_deal(
    deal_id: DealId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Vec<Bid>, CoreError> {
    let deal = Deal::find_by_id(deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;

    match actor.role {
        PartyRole::Requester => {
            if deal.requester_id != actor.id {
                return Err(CoreError::permission(
                    "you may only view bids on your own deals",
                ));
            }
            let bids = Bid::find_by_deal(deal_id, &deps.db_pool).await?;
            Ok(bids)
        }
        PartyRole::Bidder => {
            let bids = Bid::find_by_deal_and_bidder(deal_id, actor.id, &deps.db_pool).await?;
            Ok(bids)
        }
    }
}

/// All bids the calling bidder has placed, newest first.
pub async fn list_bids_for_bidder(
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Vec<Bid>, CoreError> {
    actor.require_role(PartyRole::Bidder)?;
    let bids = Bid::find_by_bidder(actor.id, &deps.db_pool).await?;
    Ok(bids)
}
