//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::{ServerDeps, StreamHub, StreamHubNotifier};
use crate::server::middleware::identity_middleware;
use crate::server::routes::{bids, connections, deals, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    /// Hub the push-delivery endpoints subscribe to.
    pub stream_hub: StreamHub,
}

/// Build the application router with all routes and middleware.
pub fn build_app(pool: PgPool) -> Router {
    let stream_hub = StreamHub::new();
    let deps = ServerDeps::new(
        pool,
        Arc::new(StreamHubNotifier::new(stream_hub.clone())),
    );
    let state = AppState { deps, stream_hub };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_handler))
        // Deals
        .route(
            "/deals",
            post(deals::create_deal_handler).get(deals::list_open_deals_handler),
        )
        .route("/deals/mine", get(deals::my_deals_handler))
        .route(
            "/deals/:id",
            get(deals::get_deal_handler).patch(deals::update_deal_handler),
        )
        .route("/deals/:id/cancel", post(deals::cancel_deal_handler))
        .route("/deals/:id/bids", get(deals::list_deal_bids_handler))
        // Bids and negotiation rounds
        .route("/bids", post(bids::submit_bid_handler))
        .route("/bids/mine", get(bids::my_bids_handler))
        .route("/bids/:id/withdraw", post(bids::withdraw_bid_handler))
        .route("/bids/:id/accept", post(bids::accept_bid_handler))
        .route("/bids/:id/reject", post(bids::reject_bid_handler))
        .route(
            "/bids/:id/rounds",
            post(bids::append_round_handler).get(bids::list_rounds_handler),
        )
        // Connections and messaging
        .route("/connections", get(connections::list_connections_handler))
        .route("/connections/:id", get(connections::get_connection_handler))
        .route(
            "/connections/:id/messages",
            post(connections::send_message_handler),
        )
        .route("/connections/:id/read", post(connections::mark_read_handler))
        .layer(middleware::from_fn(identity_middleware))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
