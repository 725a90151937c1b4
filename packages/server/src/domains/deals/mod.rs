//! Deals domain - posting, editing, cancelling, and listing deals.

pub mod activities;
pub mod models;
pub mod permissions;
