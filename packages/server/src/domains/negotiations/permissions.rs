//! Permission checks for negotiation operations.

use crate::common::{Actor, CoreError, PartyRole};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::Deal;

/// Negotiation is visible to, and driven by, exactly the deal's requester and
/// the bid's bidder, each in their own role.
pub fn can_negotiate(deal: &Deal, bid: &Bid, actor: &Actor) -> Result<(), CoreError> {
    let is_requester = actor.role == PartyRole::Requester && deal.requester_id == actor.id;
    let is_bidder = actor.role == PartyRole::Bidder && bid.bidder_id == actor.id;
    if !is_requester && !is_bidder {
        return Err(CoreError::permission(
            "you are not a participant in this negotiation",
        ));
    }
    Ok(())
}
