//! Update deal action - edits an open deal that has attracted no bids yet.

use tracing::info;

use crate::common::{Actor, CoreError, DealId};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::{Deal, DealPatch, DealStatus};
use crate::domains::deals::permissions::can_mutate_deal;
use crate::kernel::ServerDeps;

/// Edit a deal's fields and terms.
///
/// Allowed only while the deal is open and no non-withdrawn bid exists;
/// after that, terms are frozen and changes go through negotiation rounds.
pub async fn update_deal(
    deal_id: DealId,
    actor: &Actor,
    patch: DealPatch,
    deps: &ServerDeps,
) -> Result<Deal, CoreError> {
    let deal = Deal::find_by_id(deal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;

    can_mutate_deal(&deal, actor)?;

    if let Some(terms) = &patch.terms {
        terms.validate()?;
    }

    let mut tx = deps.db_pool.begin().await?;

    // Re-check under the aggregate lock; a bid may have landed since the read.
    let deal = Deal::lock_by_id(deal_id, &mut tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;

    if deal.status != DealStatus::Open {
        return Err(CoreError::conflict(format!(
            "deal is {} and can no longer be edited",
            deal.status
        )));
    }

    let live_bids = Bid::count_non_withdrawn(deal_id, &mut *tx).await?;
    if live_bids > 0 {
        return Err(CoreError::conflict(
            "deal already has bids; terms are frozen",
        ));
    }

    let updated = Deal::apply_patch(deal_id, &patch, &mut *tx).await?;
    tx.commit().await?;

    info!("Deal {} updated by requester {}", deal_id, actor.id);

    Ok(updated)
}
