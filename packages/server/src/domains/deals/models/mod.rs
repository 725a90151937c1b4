pub mod deal;
pub mod terms;

pub use deal::{Deal, DealFilter, DealListing, DealPatch, DealStatus, DealWithBidCount, NewDeal};
pub use terms::{CpaTier, DealType, Terms, MAX_CPA_TIERS};
