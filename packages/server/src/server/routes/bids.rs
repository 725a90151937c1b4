//! Bid and negotiation routes.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::BidId;
use crate::domains::bids::activities::{
    accept_bid, list_bids_for_bidder, reject_bid, submit_bid, withdraw_bid, AcceptedBid,
};
use crate::domains::bids::models::{Bid, NewBid};
use crate::domains::deals::models::Terms;
use crate::domains::negotiations::activities::{append_round, list_rounds};
use crate::domains::negotiations::models::Negotiation;
use crate::server::app::AppState;
use crate::server::middleware::AuthParty;
use crate::server::routes::error::ApiError;

pub async fn submit_bid_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Json(new_bid): Json<NewBid>,
) -> Result<(StatusCode, Json<Bid>), ApiError> {
    let bid = submit_bid(&actor, new_bid, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

pub async fn my_bids_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
) -> Result<Json<Vec<Bid>>, ApiError> {
    let bids = list_bids_for_bidder(&actor, &state.deps).await?;
    Ok(Json(bids))
}

pub async fn withdraw_bid_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(bid_id): Path<BidId>,
) -> Result<Json<Bid>, ApiError> {
    let bid = withdraw_bid(bid_id, &actor, &state.deps).await?;
    Ok(Json(bid))
}

pub async fn accept_bid_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(bid_id): Path<BidId>,
) -> Result<Json<AcceptedBid>, ApiError> {
    let accepted = accept_bid(bid_id, &actor, &state.deps).await?;
    Ok(Json(accepted))
}

pub async fn reject_bid_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(bid_id): Path<BidId>,
) -> Result<Json<Bid>, ApiError> {
    let bid = reject_bid(bid_id, &actor, &state.deps).await?;
    Ok(Json(bid))
}

/// Body for proposing a negotiation round.
#[derive(Debug, Deserialize)]
pub struct NewRound {
    pub terms: Terms,
    pub message: Option<String>,
}

pub async fn append_round_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(bid_id): Path<BidId>,
    Json(round): Json<NewRound>,
) -> Result<(StatusCode, Json<Negotiation>), ApiError> {
    let negotiation = append_round(bid_id, &actor, round.terms, round.message, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(negotiation)))
}

pub async fn list_rounds_handler(
    Extension(state): Extension<AppState>,
    AuthParty(actor): AuthParty,
    Path(bid_id): Path<BidId>,
) -> Result<Json<Vec<Negotiation>>, ApiError> {
    let rounds = list_rounds(bid_id, &actor, &state.deps).await?;
    Ok(Json(rounds))
}
