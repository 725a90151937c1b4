//! Integration tests for the post-acceptance connection and messaging
//! gateway.

mod common;

use crate::common::{bidder, cpa_terms, open_deal, place_bid, requester, TestHarness};
use server_core::common::{Actor, CoreError};
use server_core::domains::bids::activities::accept_bid;
use server_core::domains::connections::activities::{
    get_connection, list_connections, mark_read, send_message,
};
use server_core::domains::connections::models::Connection;
use server_core::kernel::NotificationEvent;
use test_context::test_context;

/// Accept a fresh deal end-to-end and hand back the connection with its two
/// parties.
async fn connected_parties(ctx: &TestHarness) -> (Connection, Actor, Actor) {
    let owner = requester();
    let hopeful = bidder();
    let deal = open_deal(&owner, cpa_terms(), &ctx.deps).await;
    let bid = place_bid(&deal, &hopeful, &ctx.deps).await;
    let accepted = accept_bid(bid.id, &owner, &ctx.deps).await.unwrap();
    (accepted.connection, owner, hopeful)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn connection_view_reveals_both_parties(ctx: &TestHarness) {
    let (connection, owner, hopeful) = connected_parties(ctx).await;

    let view = get_connection(connection.id, &owner, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(view.connection.requester_id, owner.id);
    assert_eq!(view.connection.bidder_id, hopeful.id);
    assert_eq!(view.deal.id, connection.deal_id);
    assert_eq!(view.accepted_bid.bidder_id, hopeful.id);
    assert!(view.messages.is_empty());

    // Both parties get the same view
    let view = get_connection(connection.id, &hopeful, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(view.connection.id, connection.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn strangers_cannot_open_a_connection(ctx: &TestHarness) {
    let (connection, _, _) = connected_parties(ctx).await;

    let result = get_connection(connection.id, &bidder(), &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Permission(_))));

    let result = send_message(connection.id, &requester(), "hello?", &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Permission(_))));

    let result = mark_read(connection.id, &bidder(), &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Permission(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn messages_append_in_order(ctx: &TestHarness) {
    let (connection, owner, hopeful) = connected_parties(ctx).await;

    send_message(connection.id, &owner, "Welcome aboard", &ctx.deps)
        .await
        .unwrap();
    send_message(connection.id, &hopeful, "Glad to be here", &ctx.deps)
        .await
        .unwrap();
    send_message(connection.id, &owner, "Let's talk onboarding", &ctx.deps)
        .await
        .unwrap();

    let view = get_connection(connection.id, &owner, &ctx.deps)
        .await
        .unwrap();
    let contents: Vec<_> = view.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        ["Welcome aboard", "Glad to be here", "Let's talk onboarding"]
    );
    assert!(view.messages.iter().all(|m| !m.is_read));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_messages_are_rejected(ctx: &TestHarness) {
    let (connection, owner, _) = connected_parties(ctx).await;

    let result = send_message(connection.id, &owner, "", &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    let result = send_message(connection.id, &owner, "   \n ", &ctx.deps).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn mark_read_flips_only_the_counterpartys_messages(ctx: &TestHarness) {
    let (connection, owner, hopeful) = connected_parties(ctx).await;

    send_message(connection.id, &owner, "One", &ctx.deps)
        .await
        .unwrap();
    send_message(connection.id, &owner, "Two", &ctx.deps)
        .await
        .unwrap();
    send_message(connection.id, &hopeful, "Three", &ctx.deps)
        .await
        .unwrap();

    let flipped = mark_read(connection.id, &hopeful, &ctx.deps).await.unwrap();
    assert_eq!(flipped, 2);

    let view = get_connection(connection.id, &owner, &ctx.deps)
        .await
        .unwrap();
    for message in &view.messages {
        if message.sender_id == owner.id {
            assert!(message.is_read);
        } else {
            assert!(!message.is_read, "own messages are not flipped by the sender");
        }
    }

    // Idempotent: a second call flips nothing and the state is unchanged
    let flipped = mark_read(connection.id, &hopeful, &ctx.deps).await.unwrap();
    assert_eq!(flipped, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_connections_reports_unread_counts(ctx: &TestHarness) {
    let (connection, owner, hopeful) = connected_parties(ctx).await;

    send_message(connection.id, &owner, "Ping", &ctx.deps)
        .await
        .unwrap();
    send_message(connection.id, &owner, "Ping again", &ctx.deps)
        .await
        .unwrap();

    let from_bidder_side = list_connections(&hopeful, &ctx.deps).await.unwrap();
    assert_eq!(from_bidder_side.len(), 1);
    assert_eq!(from_bidder_side[0].message_count, 2);
    assert_eq!(from_bidder_side[0].unread_count, 2);

    // The sender has nothing unread
    let from_requester_side = list_connections(&owner, &ctx.deps).await.unwrap();
    assert_eq!(from_requester_side[0].unread_count, 0);

    mark_read(connection.id, &hopeful, &ctx.deps).await.unwrap();
    let from_bidder_side = list_connections(&hopeful, &ctx.deps).await.unwrap();
    assert_eq!(from_bidder_side[0].unread_count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn send_message_notifies_the_counterparty(ctx: &TestHarness) {
    let (connection, owner, hopeful) = connected_parties(ctx).await;

    let message = send_message(connection.id, &owner, "Ping", &ctx.deps)
        .await
        .unwrap();

    let events = ctx.notifier.events_for(hopeful.id).await;
    assert!(events.contains(&NotificationEvent::MessageSent {
        connection_id: connection.id,
        message_id: message.id,
    }));

    // The sender is not notified about their own message
    let own_events = ctx.notifier.events_for(owner.id).await;
    assert!(!own_events
        .iter()
        .any(|e| matches!(e, NotificationEvent::MessageSent { .. })));
}
