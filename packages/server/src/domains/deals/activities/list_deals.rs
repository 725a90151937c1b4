//! Read-side deal queries: listings, owner views, and single-deal reads.

use serde::Serialize;

use crate::common::{Actor, CoreError, DealId, PartyRole};
use crate::domains::deals::models::{Deal, DealFilter, DealListing, DealWithBidCount};
use crate::domains::deals::permissions::can_view_deal_full;
use crate::kernel::ServerDeps;

/// Bidder-facing marketplace listing.
///
/// Only deals still accepting bids are returned, with requester identity
/// redacted.
pub async fn list_open_deals(
    filter: &DealFilter,
    deps: &ServerDeps,
) -> Result<Vec<DealListing>, CoreError> {
    let listings = Deal::list_open(filter, &deps.db_pool).await?;
    Ok(listings)
}

/// A requester's own deals, full view, newest first.
pub async fn list_deals_for_requester(
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Vec<DealWithBidCount>, CoreError> {
    actor.require_role(PartyRole::Requester)?;
    let deals = Deal::find_by_requester(actor.id, &deps.db_pool).await?;
    Ok(deals)
}

/// Role-dependent view of a single deal.
///
/// The owning requester sees the full record; a bidder sees the anonymous
/// listing. Identities are only revealed through a connection.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DealView {
    Full(Box<Deal>),
    Listing(Box<DealListing>),
}

pub async fn get_deal(
    deal_id: DealId,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<DealView, CoreError> {
    match actor.role {
        PartyRole::Requester => {
            let deal = Deal::find_by_id(deal_id, &deps.db_pool)
                .await?
                .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;
            can_view_deal_full(&deal, actor)?;
            Ok(DealView::Full(Box::new(deal)))
        }
        PartyRole::Bidder => {
            let listing = Deal::find_listing(deal_id, &deps.db_pool)
                .await?
                .ok_or_else(|| CoreError::not_found(format!("deal {}", deal_id)))?;
            Ok(DealView::Listing(Box::new(listing)))
        }
    }
}
