//! Commercial terms shared by deals, bids, and negotiation rounds.
//!
//! Terms are a tagged union keyed by the deal type; validation is a match
//! over the tag. A bid's offer and every negotiation snapshot must carry the
//! same tag as the parent deal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::CoreError;

/// Commission structure of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "deal_type", rename_all = "snake_case")]
pub enum DealType {
    /// Cost-per-acquisition: tiered payouts keyed on deposit size.
    Cpa,
    /// Volume rebates per traded lot.
    Rebates,
    /// CPA tiers plus volume rebates.
    Hybrid,
    /// Percentage share of profit and loss.
    Pnl,
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealType::Cpa => write!(f, "cpa"),
            DealType::Rebates => write!(f, "rebates"),
            DealType::Hybrid => write!(f, "hybrid"),
            DealType::Pnl => write!(f, "pnl"),
        }
    }
}

impl std::str::FromStr for DealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "cpa" => Ok(DealType::Cpa),
            "rebates" => Ok(DealType::Rebates),
            "hybrid" => Ok(DealType::Hybrid),
            "pnl" => Ok(DealType::Pnl),
            _ => Err(anyhow::anyhow!("Invalid deal type: {}", s)),
        }
    }
}

/// Maximum number of CPA tiers a deal or offer may carry.
pub const MAX_CPA_TIERS: usize = 5;

/// One CPA payout tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpaTier {
    pub tier_name: String,
    pub deposit_amount: Decimal,
    pub cpa_amount: Decimal,
}

/// Deal-type-specific terms. Stored as JSONB; the serde tag mirrors the
/// `deal_type` column so a record can never carry fields of the wrong shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "deal_type", rename_all = "snake_case")]
pub enum Terms {
    Cpa {
        tiers: Vec<CpaTier>,
    },
    Rebates {
        rebate_per_lot: Decimal,
        expected_volume_lots: Decimal,
    },
    Hybrid {
        tiers: Vec<CpaTier>,
        rebate_per_lot: Decimal,
        expected_volume_lots: Decimal,
    },
    Pnl {
        pnl_share_percent: Decimal,
    },
}

impl Terms {
    /// The deal type these terms are shaped for.
    pub fn deal_type(&self) -> DealType {
        match self {
            Terms::Cpa { .. } => DealType::Cpa,
            Terms::Rebates { .. } => DealType::Rebates,
            Terms::Hybrid { .. } => DealType::Hybrid,
            Terms::Pnl { .. } => DealType::Pnl,
        }
    }

    /// Validate the shape rules for this variant.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Terms::Cpa { tiers } => validate_tiers(tiers),
            Terms::Rebates {
                rebate_per_lot,
                expected_volume_lots,
            } => validate_rebates(*rebate_per_lot, *expected_volume_lots),
            Terms::Hybrid {
                tiers,
                rebate_per_lot,
                expected_volume_lots,
            } => {
                validate_tiers(tiers)?;
                validate_rebates(*rebate_per_lot, *expected_volume_lots)
            }
            Terms::Pnl { pnl_share_percent } => {
                if *pnl_share_percent <= Decimal::ZERO
                    || *pnl_share_percent > Decimal::ONE_HUNDRED
                {
                    return Err(CoreError::validation(
                        "pnl_share_percent must be greater than 0 and at most 100",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Validate shape rules and require the tag to match the given deal type.
    ///
    /// This is the structural check every bid offer and negotiation snapshot
    /// goes through before touching the parent deal.
    pub fn validate_against(&self, deal_type: DealType) -> Result<(), CoreError> {
        if self.deal_type() != deal_type {
            return Err(CoreError::validation(format!(
                "offered terms are shaped for a {} deal, but this deal is {}",
                self.deal_type(),
                deal_type
            )));
        }
        self.validate()
    }
}

fn validate_tiers(tiers: &[CpaTier]) -> Result<(), CoreError> {
    if tiers.is_empty() || tiers.len() > MAX_CPA_TIERS {
        return Err(CoreError::validation(format!(
            "between 1 and {} cpa tiers required, got {}",
            MAX_CPA_TIERS,
            tiers.len()
        )));
    }
    for tier in tiers {
        if tier.deposit_amount <= Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "tier '{}' has a non-positive deposit amount",
                tier.tier_name
            )));
        }
        if tier.cpa_amount <= Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "tier '{}' has a non-positive cpa amount",
                tier.tier_name
            )));
        }
    }
    Ok(())
}

fn validate_rebates(rebate_per_lot: Decimal, expected_volume_lots: Decimal) -> Result<(), CoreError> {
    if rebate_per_lot <= Decimal::ZERO {
        return Err(CoreError::validation("rebate_per_lot must be positive"));
    }
    if expected_volume_lots <= Decimal::ZERO {
        return Err(CoreError::validation(
            "expected_volume_lots must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn tier(name: &str, deposit: &str, cpa: &str) -> CpaTier {
        CpaTier {
            tier_name: name.to_string(),
            deposit_amount: deposit.parse().unwrap(),
            cpa_amount: cpa.parse().unwrap(),
        }
    }

    #[test]
    fn test_cpa_terms_valid() {
        let terms = Terms::Cpa {
            tiers: vec![tier("Tier 1", "250", "400"), tier("Tier 2", "500", "600")],
        };
        assert!(terms.validate().is_ok());
        assert_eq!(terms.deal_type(), DealType::Cpa);
    }

    #[test]
    fn test_cpa_terms_require_at_least_one_tier() {
        let terms = Terms::Cpa { tiers: vec![] };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_cpa_terms_reject_more_than_five_tiers() {
        let tiers = (0..6)
            .map(|i| tier(&format!("Tier {}", i), "100", "100"))
            .collect();
        let terms = Terms::Cpa { tiers };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_cpa_terms_reject_non_positive_amounts() {
        let terms = Terms::Cpa {
            tiers: vec![tier("Tier 1", "0", "400")],
        };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));

        let terms = Terms::Cpa {
            tiers: vec![tier("Tier 1", "250", "-5")],
        };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_rebates_terms_valid() {
        let terms = Terms::Rebates {
            rebate_per_lot: dec("5"),
            expected_volume_lots: dec("1000"),
        };
        assert!(terms.validate().is_ok());
    }

    #[test]
    fn test_rebates_terms_reject_non_positive_volume() {
        let terms = Terms::Rebates {
            rebate_per_lot: dec("5"),
            expected_volume_lots: dec("0"),
        };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_hybrid_terms_require_both_parts() {
        let terms = Terms::Hybrid {
            tiers: vec![],
            rebate_per_lot: dec("5"),
            expected_volume_lots: dec("1000"),
        };
        assert!(matches!(terms.validate(), Err(CoreError::Validation(_))));

        let terms = Terms::Hybrid {
            tiers: vec![tier("Tier 1", "250", "400")],
            rebate_per_lot: dec("5"),
            expected_volume_lots: dec("1000"),
        };
        assert!(terms.validate().is_ok());
    }

    #[test]
    fn test_pnl_terms_bounds() {
        let valid = Terms::Pnl {
            pnl_share_percent: dec("35"),
        };
        assert!(valid.validate().is_ok());

        let at_limit = Terms::Pnl {
            pnl_share_percent: dec("100"),
        };
        assert!(at_limit.validate().is_ok());

        let zero = Terms::Pnl {
            pnl_share_percent: dec("0"),
        };
        assert!(matches!(zero.validate(), Err(CoreError::Validation(_))));

        let over = Terms::Pnl {
            pnl_share_percent: dec("101"),
        };
        assert!(matches!(over.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_validate_against_rejects_shape_mismatch() {
        let offer = Terms::Rebates {
            rebate_per_lot: dec("5"),
            expected_volume_lots: dec("1000"),
        };
        let result = offer.validate_against(DealType::Cpa);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_serde_tag_matches_deal_type() {
        let terms = Terms::Pnl {
            pnl_share_percent: dec("50"),
        };
        let json = serde_json::to_value(&terms).unwrap();
        assert_eq!(json["deal_type"], "pnl");

        let back: Terms = serde_json::from_value(json).unwrap();
        assert_eq!(back, terms);
    }

    #[test]
    fn test_serde_rejects_mixed_shape() {
        // rebates fields under a cpa tag must not deserialize
        let json = serde_json::json!({
            "deal_type": "cpa",
            "rebate_per_lot": "5",
            "expected_volume_lots": "1000",
        });
        assert!(serde_json::from_value::<Terms>(json).is_err());
    }
}
