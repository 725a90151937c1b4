//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::common::{BidId, DealId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let deal_id: DealId = DealId::new();
//! let bid_id: BidId = BidId::new();
//!
//! // This would be a compile error:
//! // let wrong: BidId = deal_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for marketplace parties (requesters and bidders).
///
/// Party records live in the external identity service; the core only
/// ever handles their ids.
pub struct Party;

/// Marker type for Deal entities (posted deal requests).
pub struct Deal;

/// Marker type for Bid entities (offers against a deal).
pub struct Bid;

/// Marker type for Negotiation entities (counter-offer rounds).
pub struct Negotiation;

/// Marker type for Connection entities (de-anonymized matches).
pub struct Connection;

/// Marker type for Message entities (private connection messages).
pub struct Message;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for marketplace parties.
pub type PartyId = Id<Party>;

/// Typed ID for Deal entities.
pub type DealId = Id<Deal>;

/// Typed ID for Bid entities.
pub type BidId = Id<Bid>;

/// Typed ID for Negotiation entities.
pub type NegotiationId = Id<Negotiation>;

/// Typed ID for Connection entities.
pub type ConnectionId = Id<Connection>;

/// Typed ID for Message entities.
pub type MessageId = Id<Message>;
