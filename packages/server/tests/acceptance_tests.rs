//! Integration tests for the acceptance resolver: atomic close-and-connect,
//! permission rules, and the concurrent acceptance race.

mod common;

use crate::common::{bidder, cpa_terms, open_deal, place_bid, requester, TestHarness};
use server_core::common::CoreError;
use server_core::domains::bids::activities::accept_bid;
use server_core::domains::bids::models::{Bid, BidStatus};
use server_core::domains::connections::models::Connection;
use server_core::domains::deals::activities::cancel_deal;
use server_core::domains::deals::models::{Deal, DealStatus};
use server_core::kernel::NotificationEvent;
use test_context::test_context;

async fn connection_count(deal: &Deal, ctx: &TestHarness) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM connections WHERE deal_id = $1")
        .bind(deal.id)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn accept_closes_deal_rejects_siblings_and_connects(ctx: &TestHarness) {
    let owner = requester();
    let winner = bidder();
    let loser = bidder();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let winning_bid = place_bid(&deal, &winner, &ctx.deps).await;
    let losing_bid = place_bid(&deal, &loser, &ctx.deps).await;

    let accepted = accept_bid(winning_bid.id, &owner, &ctx.deps).await.unwrap();

    assert_eq!(accepted.bid.status, BidStatus::Accepted);
    assert_eq!(accepted.connection.deal_id, deal.id);
    assert_eq!(accepted.connection.requester_id, owner.id);
    assert_eq!(accepted.connection.bidder_id, winner.id);
    // The connection freezes the accepted offer
    assert_eq!(accepted.connection.final_terms.0, accepted.bid.offer.0);

    let deal_after = Deal::find_by_id(deal.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deal_after.status, DealStatus::Closed);

    let losing_after = Bid::find_by_id(losing_bid.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(losing_after.status, BidStatus::Rejected);

    assert_eq!(connection_count(&deal, ctx).await, 1);

    // Winner learns of the connection, loser of the rejection
    let winner_events = ctx.notifier.events_for(winner.id).await;
    assert!(winner_events.contains(&NotificationEvent::BidAccepted {
        deal_id: deal.id,
        bid_id: winning_bid.id,
        connection_id: accepted.connection.id,
    }));
    let loser_events = ctx.notifier.events_for(loser.id).await;
    assert!(loser_events.contains(&NotificationEvent::BidRejected {
        deal_id: deal.id,
        bid_id: losing_bid.id,
    }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_the_deal_owner_accepts(ctx: &TestHarness) {
    let owner = requester();
    let hopeful = bidder();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let bid = place_bid(&deal, &hopeful, &ctx.deps).await;

    let result = accept_bid(bid.id, &requester(), &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Permission(_))));

    let result = accept_bid(bid.id, &hopeful, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Permission(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn accept_after_cancellation_fails(ctx: &TestHarness) {
    let owner = requester();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let bid = place_bid(&deal, &bidder(), &ctx.deps).await;

    cancel_deal(deal.id, &owner, &ctx.deps).await.unwrap();

    let result = accept_bid(bid.id, &owner, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Conflict(_))));
    assert_eq!(connection_count(&deal, ctx).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn accept_loses_to_an_earlier_acceptance(ctx: &TestHarness) {
    let owner = requester();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let b1 = place_bid(&deal, &bidder(), &ctx.deps).await;
    let b2 = place_bid(&deal, &bidder(), &ctx.deps).await;

    accept_bid(b1.id, &owner, &ctx.deps).await.unwrap();

    let result = accept_bid(b2.id, &owner, &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Conflict(_))));
    assert_eq!(connection_count(&deal, ctx).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_acceptances_resolve_to_one_winner(ctx: &TestHarness) {
    let owner = requester();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let b1 = place_bid(&deal, &bidder(), &ctx.deps).await;
    let b2 = place_bid(&deal, &bidder(), &ctx.deps).await;

    let (r1, r2) = tokio::join!(
        accept_bid(b1.id, &owner, &ctx.deps),
        accept_bid(b2.id, &owner, &ctx.deps),
    );

    // Exactly one call wins; the other observes the changed aggregate
    let winners = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1, "exactly one acceptance must succeed");
    for result in [&r1, &r2] {
        if let Err(e) = result {
            assert!(matches!(e, CoreError::Conflict(_)), "loser must conflict, got {e}");
        }
    }

    let deal_after = Deal::find_by_id(deal.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deal_after.status, DealStatus::Closed);

    let b1_after = Bid::find_by_id(b1.id, &ctx.db_pool).await.unwrap().unwrap();
    let b2_after = Bid::find_by_id(b2.id, &ctx.db_pool).await.unwrap().unwrap();
    let statuses = [b1_after.status, b2_after.status];
    assert!(statuses.contains(&BidStatus::Accepted));
    assert!(statuses.contains(&BidStatus::Rejected));

    assert_eq!(connection_count(&deal, ctx).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn at_most_one_accepted_bid_per_deal(ctx: &TestHarness) {
    let owner = requester();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let bids: Vec<_> = [
        place_bid(&deal, &bidder(), &ctx.deps).await,
        place_bid(&deal, &bidder(), &ctx.deps).await,
        place_bid(&deal, &bidder(), &ctx.deps).await,
    ]
    .into();

    accept_bid(bids[1].id, &owner, &ctx.deps).await.unwrap();

    let accepted_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bids WHERE deal_id = $1 AND status = 'accepted'",
    )
    .bind(deal.id)
    .fetch_one(&ctx.db_pool)
    .await
    .unwrap();
    assert_eq!(accepted_count, 1);

    let accepted = Bid::find_accepted_for_deal(deal.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.id, bids[1].id);

    let connection =
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE deal_id = $1")
            .bind(deal.id)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(connection.bidder_id, accepted.bidder_id);
}
