pub mod bid;

pub use bid::{Bid, BidStatus, NewBid};
