//! Bid lifecycle activities, including the acceptance resolver.

pub mod accept_bid;
pub mod list_bids;
pub mod reject_bid;
pub mod submit_bid;
pub mod withdraw_bid;

pub use accept_bid::{accept_bid, AcceptedBid};
pub use list_bids::{list_bids_for_bidder, list_bids_for_deal};
pub use reject_bid::reject_bid;
pub use submit_bid::submit_bid;
pub use withdraw_bid::withdraw_bid;
