//! Bids domain - submitting, withdrawing, and deciding bids.

pub mod activities;
pub mod models;
pub mod permissions;
