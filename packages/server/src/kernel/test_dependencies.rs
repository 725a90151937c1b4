//! Test doubles for server dependencies.
//!
//! Integration tests build a real Postgres pool via testcontainers and pair
//! it with a recording notifier so notification emission can be asserted.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::common::PartyId;
use crate::kernel::deps::ServerDeps;
use crate::kernel::notify::{NotificationEvent, Notifier};

/// Notifier that records every event instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(PartyId, NotificationEvent)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far, in emission order.
    pub async fn events(&self) -> Vec<(PartyId, NotificationEvent)> {
        self.events.lock().await.clone()
    }

    /// Events delivered to a specific party.
    pub async fn events_for(&self, party_id: PartyId) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|(p, _)| *p == party_id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, party_id: PartyId, event: NotificationEvent) {
        self.events.lock().await.push((party_id, event));
    }
}

/// Build ServerDeps backed by the given pool and a recording notifier.
///
/// Returns the deps plus a handle to the recorder for assertions.
pub fn test_deps(db_pool: PgPool) -> (ServerDeps, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let deps = ServerDeps::new(db_pool, notifier.clone());
    (deps, notifier)
}
