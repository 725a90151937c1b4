//! Generic in-process pub/sub hub for real-time delivery.
//!
//! Provides topic-keyed broadcast channels for pushing notification events to
//! connected delivery endpoints. Topics are opaque strings — the hub has no
//! knowledge of what's being streamed. The marketplace publishes to one topic
//! per party (see `kernel::notify::party_topic`).
//!
//! # Usage
//!
//! Producers (domain activities, via `Notifier`):
//!   hub.publish("party:abc-123", json!({"type": "bid_submitted", ...})).await;
//!
//! Consumers (push-delivery endpoints):
//!   let rx = hub.subscribe("party:abc-123").await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Generic in-process pub/sub hub.
///
/// Thread-safe, cloneable. Keyed by string topics.
/// Payloads are `serde_json::Value` — domains serialize their own types.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    /// Create a new StreamHub with default capacity (256 messages per channel).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new StreamHub with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish a JSON value to a topic. No-op if no subscribers.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(value);
        }
    }

    /// Subscribe to a topic. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Remove channels with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}
