//! Negotiation activities.

pub mod append_round;
pub mod list_rounds;

pub use append_round::append_round;
pub use list_rounds::list_rounds;
