pub mod bids;
pub mod connections;
pub mod deals;
pub mod error;
pub mod health;

pub use error::ApiError;
pub use health::health_handler;
