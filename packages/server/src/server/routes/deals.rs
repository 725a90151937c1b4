//! Deal routes.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::DealId;
use crate::domains::bids::activities::list_bids_for_deal;
use crate::domains::bids::models::Bid;
use crate::domains::deals::activities::{
    cancel_deal, create_deal, get_deal, list_deals_for_requester, list_open_deals, update_deal,
    DealView,
};
use crate::domains::deals::models::{
    Deal, DealFilter, DealListing, DealPatch, DealType, DealWithBidCount, NewDeal,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthParty;
use crate::server::routes::error::ApiError;

pub async fn create_deal_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Json(new_deal): Json<NewDeal>,
) -> Result<(StatusCode, Json<Deal>), ApiError> {
    let deal = create_deal(&actor, new_deal, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

/// Query parameters for the marketplace listing. Instruments arrive
/// comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct DealFilterParams {
    pub region: Option<String>,
    pub deal_type: Option<DealType>,
    pub instruments: Option<String>,
}

impl From<DealFilterParams> for DealFilter {
    fn from(params: DealFilterParams) -> Self {
        DealFilter {
            region: params.region,
            deal_type: params.deal_type,
            instruments: params
                .instruments
                .map(|s| {
                    s.split(',')
                        .map(|i| i.trim().to_string())
                        .filter(|i| !i.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

pub async fn list_open_deals_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<DealFilterParams>,
) -> Result<Json<Vec<DealListing>>, ApiError> {
    let filter = params.into();
    let listings = list_open_deals(&filter, &state.deps).await?;
    Ok(Json(listings))
}

pub async fn my_deals_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
) -> Result<Json<Vec<DealWithBidCount>>, ApiError> {
    let deals = list_deals_for_requester(&actor, &state.deps).await?;
    Ok(Json(deals))
}

pub async fn get_deal_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(deal_id): Path<DealId>,
) -> Result<Json<DealView>, ApiError> {
    let view = get_deal(deal_id, &actor, &state.deps).await?;
    Ok(Json(view))
}

pub async fn update_deal_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(deal_id): Path<DealId>,
    Json(patch): Json<DealPatch>,
) -> Result<Json<Deal>, ApiError> {
    let deal = update_deal(deal_id, &actor, patch, &state.deps).await?;
    Ok(Json(deal))
}

pub async fn cancel_deal_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(deal_id): Path<DealId>,
) -> Result<Json<Deal>, ApiError> {
    let deal = cancel_deal(deal_id, &actor, &state.deps).await?;
    Ok(Json(deal))
}

pub async fn list_deal_bids_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(deal_id): Path<DealId>,
) -> Result<Json<Vec<Bid>>, ApiError> {
    let bids = list_bids_for_deal(deal_id, &actor, &state.deps).await?;
    Ok(Json(bids))
}
