//! Create deal action - posts a new deal in open status.

use tracing::info;

use crate::common::{Actor, CoreError, PartyRole};
use crate::domains::deals::models::{Deal, NewDeal};
use crate::kernel::ServerDeps;

/// Post a new deal on behalf of a requester.
///
/// The deal type is derived from the terms tag; terms are validated against
/// the shape rules for that type before anything is written.
pub async fn create_deal(
    actor: &Actor,
    new_deal: NewDeal,
    deps: &ServerDeps,
) -> Result<Deal, CoreError> {
    actor.require_role(PartyRole::Requester)?;
    new_deal.terms.validate()?;

    let deal = Deal::create(actor.id, &new_deal, &deps.db_pool).await?;

    info!(
        "Deal {} created by requester {} ({})",
        deal.id, actor.id, deal.deal_type
    );

    Ok(deal)
}
