//! Caller identity for core operations.
//!
//! The core never performs credential checks. Every operation receives a
//! validated `Actor` — the `(party id, role)` pair the transport layer
//! extracted from the upstream identity gateway.

use serde::{Deserialize, Serialize};

use crate::common::{CoreError, PartyId};

/// Role of a marketplace party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// Posts deals and accepts/rejects bids.
    Requester,
    /// Submits bids against open deals.
    Bidder,
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartyRole::Requester => write!(f, "requester"),
            PartyRole::Bidder => write!(f, "bidder"),
        }
    }
}

impl std::str::FromStr for PartyRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "requester" => Ok(PartyRole::Requester),
            "bidder" => Ok(PartyRole::Bidder),
            _ => Err(anyhow::anyhow!("Invalid party role: {}", s)),
        }
    }
}

/// Validated caller identity passed into every core operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: PartyId,
    pub role: PartyRole,
}

impl Actor {
    pub fn new(id: PartyId, role: PartyRole) -> Self {
        Self { id, role }
    }

    /// Requires the actor to hold the given role.
    pub fn require_role(&self, role: PartyRole) -> Result<(), CoreError> {
        if self.role != role {
            return Err(CoreError::permission(format!(
                "operation requires the {} role",
                role
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_matches() {
        let actor = Actor::new(PartyId::new(), PartyRole::Requester);
        assert!(actor.require_role(PartyRole::Requester).is_ok());
    }

    #[test]
    fn test_require_role_rejects_other_role() {
        let actor = Actor::new(PartyId::new(), PartyRole::Bidder);
        let result = actor.require_role(PartyRole::Requester);
        assert!(matches!(result, Err(CoreError::Permission(_))));
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [PartyRole::Requester, PartyRole::Bidder] {
            let parsed: PartyRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }
}
