//! Submit bid action - attaches a new bid to an open deal.

use tracing::info;

use crate::common::{Actor, CoreError, PartyRole};
use crate::domains::bids::models::{Bid, NewBid};
use crate::domains::deals::models::{Deal, DealStatus};
use crate::kernel::{NotificationEvent, ServerDeps};

/// Place a bid on a deal.
///
/// The first bid advances the deal open → in_negotiation inside the same
/// transaction. A bidder may hold at most one live bid per deal.
pub async fn submit_bid(
    actor: &Actor,
    new_bid: NewBid,
    deps: &ServerDeps,
) -> Result<Bid, CoreError> {
    actor.require_role(PartyRole::Bidder)?;

    let mut tx = deps.db_pool.begin().await?;

    let deal = Deal::lock_by_id(new_bid.deal_id, &mut tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", new_bid.deal_id)))?;

    if !deal.status.accepts_bids() {
        return Err(CoreError::conflict(format!(
            "deal is {} and not accepting bids",
            deal.status
        )));
    }

    new_bid.offer.validate_against(deal.deal_type)?;

    if Bid::find_active_for_bidder(deal.id, actor.id, &mut *tx)
        .await?
        .is_some()
    {
        return Err(CoreError::conflict(
            "you already have an active bid on this deal",
        ));
    }

    let bid = Bid::create(
        deal.id,
        actor.id,
        &new_bid.offer,
        new_bid.message.as_deref(),
        &mut *tx,
    )
    .await?;

    if deal.status == DealStatus::Open {
        Deal::set_status(deal.id, DealStatus::InNegotiation, &mut *tx).await?;
    }

    tx.commit().await?;

    deps.notifier
        .notify(
            deal.requester_id,
            NotificationEvent::BidSubmitted {
                deal_id: deal.id,
                bid_id: bid.id,
            },
        )
        .await;

    info!(
        "Bid {} submitted on deal {} by bidder {}",
        bid.id, deal.id, actor.id
    );

    Ok(bid)
}
