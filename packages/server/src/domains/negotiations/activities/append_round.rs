//! Append round action - one counter-offer exchange on a live bid.

use tracing::info;

use crate::common::{Actor, BidId, CoreError, PartyId};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::{Deal, Terms};
use crate::domains::negotiations::models::Negotiation;
use crate::domains::negotiations::permissions::can_negotiate;
use crate::kernel::{NotificationEvent, ServerDeps};

/// Propose revised terms on a bid.
///
/// Turns strictly alternate: whoever proposed the most recent round (the
/// original bid counting as round 0 from the bidder) may not propose the
/// next one. The bid's current offer is replaced by the new snapshot and the
/// bid moves to countered.
pub async fn append_round(
    bid_id: BidId,
    actor: &Actor,
    terms: Terms,
    message: Option<String>,
    deps: &ServerDeps,
) -> Result<Negotiation, CoreError> {
    let mut tx = deps.db_pool.begin().await?;

    let bid = Bid::find_by_id(bid_id, &mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    let deal = Deal::lock_by_id(bid.deal_id, &mut tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", bid.deal_id)))?;

    // Re-read under the aggregate lock
    let bid = Bid::find_by_id(bid_id, &mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("bid {}", bid_id)))?;

    can_negotiate(&deal, &bid, actor)?;

    if !bid.status.is_active() {
        return Err(CoreError::conflict(format!(
            "bid is {}; negotiation is closed",
            bid.status
        )));
    }

    terms.validate_against(deal.deal_type)?;

    let last = Negotiation::last_for_bid(bid_id, &mut *tx).await?;
    let (last_proposer, last_round) = match &last {
        Some(round) => (round.proposed_by, round.round),
        None => (bid.bidder_id, 0),
    };

    if last_proposer == actor.id {
        return Err(CoreError::conflict(
            "it is the counterparty's turn to propose",
        ));
    }

    let negotiation = Negotiation::create(
        bid_id,
        actor.id,
        last_round + 1,
        &terms,
        message.as_deref(),
        &mut *tx,
    )
    .await?;

    Bid::update_offer(bid_id, &terms, &mut *tx).await?;

    tx.commit().await?;

    let counterparty = counterparty_of(&deal, &bid, actor.id);
    deps.notifier
        .notify(
            counterparty,
            NotificationEvent::NegotiationRound {
                bid_id,
                round: negotiation.round,
            },
        )
        .await;

    info!(
        "Negotiation round {} on bid {} proposed by {}",
        negotiation.round, bid_id, actor.id
    );

    Ok(negotiation)
}

fn counterparty_of(deal: &Deal, bid: &Bid, actor_id: PartyId) -> PartyId {
    if actor_id == deal.requester_id {
        bid.bidder_id
    } else {
        deal.requester_id
    }
}
