//! Permission checks for deal operations.
//!
//! Each operation has a single check taking the entity and the caller,
//! testable without any transport or database.

use crate::common::{Actor, CoreError, PartyRole};
use crate::domains::deals::models::Deal;

/// Only the owning requester may mutate (update or cancel) a deal.
pub fn can_mutate_deal(deal: &Deal, actor: &Actor) -> Result<(), CoreError> {
    if actor.role != PartyRole::Requester || deal.requester_id != actor.id {
        return Err(CoreError::permission(
            "only the requester who posted this deal may modify it",
        ));
    }
    Ok(())
}

/// Requesters may view their own deals in full; bidders see the redacted
/// listing instead (handled by the caller choosing the view).
pub fn can_view_deal_full(deal: &Deal, actor: &Actor) -> Result<(), CoreError> {
    if deal.requester_id != actor.id {
        return Err(CoreError::permission("you may only view your own deals"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DealId, PartyId};
    use crate::domains::deals::models::{DealStatus, DealType, Terms};
    use sqlx::types::Json;

    fn deal_owned_by(requester_id: PartyId) -> Deal {
        Deal {
            id: DealId::new(),
            requester_id,
            title: "EU forex traffic".to_string(),
            description: "Steady FTD flow".to_string(),
            deal_type: DealType::Pnl,
            terms: Json(Terms::Pnl {
                pnl_share_percent: "40".parse().unwrap(),
            }),
            region: "EU".to_string(),
            instruments: vec!["EURUSD".to_string()],
            additional_terms: None,
            expires_at: None,
            status: DealStatus::Open,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_mutate() {
        let owner = PartyId::new();
        let deal = deal_owned_by(owner);
        let actor = Actor::new(owner, PartyRole::Requester);
        assert!(can_mutate_deal(&deal, &actor).is_ok());
    }

    #[test]
    fn test_other_requester_cannot_mutate() {
        let deal = deal_owned_by(PartyId::new());
        let actor = Actor::new(PartyId::new(), PartyRole::Requester);
        assert!(matches!(
            can_mutate_deal(&deal, &actor),
            Err(CoreError::Permission(_))
        ));
    }

    #[test]
    fn test_bidder_cannot_mutate_even_with_matching_id() {
        let owner = PartyId::new();
        let deal = deal_owned_by(owner);
        let actor = Actor::new(owner, PartyRole::Bidder);
        assert!(matches!(
            can_mutate_deal(&deal, &actor),
            Err(CoreError::Permission(_))
        ));
    }
}
