//! Cancel deal action - terminal transition with a cascade to open bids.

use tracing::info;

use crate::common::{Actor, CoreError, DealId};
use crate::domains::bids::models::Bid;
use crate::domains::deals::models::{Deal, DealStatus};
use crate::domains::deals::permissions::can_mutate_deal;
use crate::kernel::{NotificationEvent, ServerDeps};

/// Cancel a deal.
///
/// Every still-open bid on the deal is rejected in the same transaction, so
/// no bid can be accepted against a cancelled deal afterwards.
pub async fn cancel_deal(
    deal_id: DealId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Deal, CoreError> {
    let mut tx = deps.db_pool.begin().await?;

    let deal = Deal::lock_by_id(deal_id, &mut tx)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;

    can_mutate_deal(&deal, actor)?;

    if deal.status.is_terminal() {
        return Err(CoreError::conflict(format!(
            "deal is already {}",
            deal.status
        )));
    }

    let rejected = Bid::reject_all_active(deal_id, &mut *tx).await?;
    let cancelled = Deal::set_status(deal_id, DealStatus::Cancelled, &mut *tx).await?;

    tx.commit().await?;

    for bid in &rejected {
        deps.notifier
            .notify(
                bid.bidder_id,
                NotificationEvent::BidRejected {
                    deal_id,
                    bid_id: bid.id,
                },
            )
            .await;
    }

    info!(
        "Deal {} cancelled by requester {}; {} open bid(s) rejected",
        deal_id,
        actor.id,
        rejected.len()
    );

    Ok(cancelled)
}
