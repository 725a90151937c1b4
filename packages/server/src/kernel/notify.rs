//! Notification events emitted to the push-delivery collaborator.
//!
//! Delivery is fire-and-forget: the emitting transaction has already
//! committed by the time an event is published, and a delivery failure never
//! rolls anything back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::{BidId, ConnectionId, DealId, MessageId, PartyId};
use crate::kernel::stream_hub::StreamHub;

/// Events pushed to a party after a core operation succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A new bid landed on one of the requester's deals.
    BidSubmitted { deal_id: DealId, bid_id: BidId },

    /// The requester accepted the bidder's bid; a connection now exists.
    BidAccepted {
        deal_id: DealId,
        bid_id: BidId,
        connection_id: ConnectionId,
    },

    /// The bid was rejected (explicitly, by losing the acceptance race, or
    /// by deal cancellation).
    BidRejected { deal_id: DealId, bid_id: BidId },

    /// The counterparty proposed a new negotiation round.
    NegotiationRound { bid_id: BidId, round: i32 },

    /// The counterparty sent a private message.
    MessageSent {
        connection_id: ConnectionId,
        message_id: MessageId,
    },
}

/// Push-delivery seam. Production uses the in-process [`StreamHub`];
/// tests substitute a recorder.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an event to a party. Must never fail the caller.
    async fn notify(&self, party_id: PartyId, event: NotificationEvent);
}

/// Topic a party's delivery endpoint subscribes to.
pub fn party_topic(party_id: PartyId) -> String {
    format!("party:{}", party_id)
}

/// Notifier that publishes onto the in-process stream hub.
pub struct StreamHubNotifier {
    hub: StreamHub,
}

impl StreamHubNotifier {
    pub fn new(hub: StreamHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Notifier for StreamHubNotifier {
    async fn notify(&self, party_id: PartyId, event: NotificationEvent) {
        match serde_json::to_value(&event) {
            Ok(value) => self.hub.publish(&party_topic(party_id), value).await,
            Err(e) => warn!("Failed to serialize notification event: {}", e),
        }
    }
}
