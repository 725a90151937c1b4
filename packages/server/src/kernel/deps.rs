//! Server dependencies for domain activities.
//!
//! This module provides the central dependency container passed into every
//! activity. The persistence handle and the push-delivery collaborator are
//! constructed once at process bootstrap and handed in explicitly — business
//! logic never reaches for an ambient singleton.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::notify::Notifier;

/// Dependencies accessible to domain activities.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Push-delivery collaborator for real-time notifications (fire-and-forget).
    pub notifier: Arc<dyn Notifier>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(db_pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self { db_pool, notifier }
    }
}
