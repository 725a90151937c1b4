//! Permission checks for bid operations.

use crate::common::{Actor, CoreError, PartyRole};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::Deal;

/// Only the bidder who placed a bid may withdraw it.
pub fn can_withdraw_bid(bid: &Bid, actor: &Actor) -> Result<(), CoreError> {
    if actor.role != PartyRole::Bidder || bid.bidder_id != actor.id {
        return Err(CoreError::permission(
            "only the bidder who placed this bid may withdraw it",
        ));
    }
    Ok(())
}

/// Only the requester who owns the parent deal may accept or reject a bid.
pub fn can_decide_bid(deal: &Deal, actor: &Actor) -> Result<(), CoreError> {
    if actor.role != PartyRole::Requester || deal.requester_id != actor.id {
        return Err(CoreError::permission(
            "only the requester who posted this deal may decide its bids",
        ));
    }
    Ok(())
}

/// Whether the actor may see an individual bid: the parent deal's requester
/// or the bid's own bidder.
pub fn can_view_bid(deal: &Deal, bid: &Bid, actor: &Actor) -> Result<(), CoreError> {
    let is_requester = actor.role == PartyRole::Requester && deal.requester_id == actor.id;
    let is_bidder = actor.role == PartyRole::Bidder && bid.bidder_id == actor.id;
    if !is_requester && !is_bidder {
        return Err(CoreError::permission(
            "you are not a participant on this bid",
        ));
    }
    Ok(())
}
