//! Shared fixtures: actors, terms, and prebuilt deal/bid scenarios.

use server_core::common::{Actor, PartyId, PartyRole};
use server_core::domains::bids::activities::submit_bid;
use server_core::domains::bids::models::{Bid, NewBid};
use server_core::domains::deals::activities::create_deal;
use server_core::domains::deals::models::{CpaTier, Deal, NewDeal, Terms};
use server_core::kernel::ServerDeps;

pub fn requester() -> Actor {
    Actor::new(PartyId::new(), PartyRole::Requester)
}

pub fn bidder() -> Actor {
    Actor::new(PartyId::new(), PartyRole::Bidder)
}

/// Unique region per test so marketplace listing tests don't see each
/// other's deals on the shared database.
pub fn unique_region() -> String {
    format!("region-{}", uuid::Uuid::new_v4())
}

pub fn dec(s: &str) -> rust_decimal::Decimal {
    s.parse().unwrap()
}

pub fn cpa_terms() -> Terms {
    Terms::Cpa {
        tiers: vec![
            CpaTier {
                tier_name: "Tier 1".to_string(),
                deposit_amount: dec("250"),
                cpa_amount: dec("400"),
            },
            CpaTier {
                tier_name: "Tier 2".to_string(),
                deposit_amount: dec("500"),
                cpa_amount: dec("600"),
            },
        ],
    }
}

pub fn rebates_terms() -> Terms {
    Terms::Rebates {
        rebate_per_lot: dec("5"),
        expected_volume_lots: dec("1000"),
    }
}

pub fn hybrid_terms() -> Terms {
    Terms::Hybrid {
        tiers: vec![CpaTier {
            tier_name: "Tier 1".to_string(),
            deposit_amount: dec("300"),
            cpa_amount: dec("500"),
        }],
        rebate_per_lot: dec("3"),
        expected_volume_lots: dec("500"),
    }
}

pub fn pnl_terms() -> Terms {
    Terms::Pnl {
        pnl_share_percent: dec("40"),
    }
}

/// A well-formed NewDeal with the given terms in its own unique region.
pub fn new_deal(terms: Terms) -> NewDeal {
    NewDeal {
        title: "EU forex traffic".to_string(),
        description: "Consistent FTD flow from regulated sources".to_string(),
        terms,
        region: unique_region(),
        instruments: vec!["EURUSD".to_string(), "XAUUSD".to_string()],
        additional_terms: None,
        expires_at: None,
    }
}

/// Create an open deal owned by `owner`.
pub async fn open_deal(owner: &Actor, terms: Terms, deps: &ServerDeps) -> Deal {
    create_deal(owner, new_deal(terms), deps)
        .await
        .expect("Failed to create fixture deal")
}

/// Submit a bid mirroring the deal's own terms shape.
pub async fn place_bid(deal: &Deal, by: &Actor, deps: &ServerDeps) -> Bid {
    submit_bid(
        by,
        NewBid {
            deal_id: deal.id,
            offer: deal.terms.0.clone(),
            message: Some("Happy to match these terms".to_string()),
        },
        deps,
    )
    .await
    .expect("Failed to submit fixture bid")
}
