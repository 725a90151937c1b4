//! Connections domain - post-acceptance visibility and private messaging.

pub mod activities;
pub mod models;
pub mod permissions;
