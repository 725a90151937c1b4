//! Deal lifecycle activities.

pub mod cancel_deal;
pub mod create_deal;
pub mod list_deals;
pub mod update_deal;

pub use cancel_deal::cancel_deal;
pub use create_deal::create_deal;
pub use list_deals::{get_deal, list_deals_for_requester, list_open_deals, DealView};
pub use update_deal::update_deal;
