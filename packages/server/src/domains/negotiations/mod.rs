//! Negotiations domain - counter-offer rounds on live bids.

pub mod activities;
pub mod models;
pub mod permissions;
