use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnection;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::common::{DealId, PartyId};
use crate::domains::deals::models::terms::{DealType, Terms};

/// Deal status state machine.
///
/// Transitions: open → in_negotiation → closed, or {open, in_negotiation} →
/// cancelled. Closed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "deal_status", rename_all = "snake_case")]
pub enum DealStatus {
    Open,
    InNegotiation,
    Closed,
    Cancelled,
}

impl DealStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStatus::Closed | DealStatus::Cancelled)
    }

    /// Whether the deal accepts new bids in this status.
    pub fn accepts_bids(&self) -> bool {
        matches!(self, DealStatus::Open | DealStatus::InNegotiation)
    }

    /// The legal transition matrix.
    pub fn can_transition_to(&self, next: DealStatus) -> bool {
        use DealStatus::*;
        matches!(
            (self, next),
            (Open, InNegotiation) | (Open, Cancelled) | (InNegotiation, Closed) | (InNegotiation, Cancelled)
        )
    }
}

impl std::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealStatus::Open => write!(f, "open"),
            DealStatus::InNegotiation => write!(f, "in_negotiation"),
            DealStatus::Closed => write!(f, "closed"),
            DealStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for DealStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "open" => Ok(DealStatus::Open),
            "in_negotiation" => Ok(DealStatus::InNegotiation),
            "closed" => Ok(DealStatus::Closed),
            "cancelled" => Ok(DealStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid deal status: {}", s)),
        }
    }
}

/// Deal - a requester's posted request for offers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deal {
    pub id: DealId,
    pub requester_id: PartyId,
    pub title: String,
    pub description: String,
    pub deal_type: DealType,
    pub terms: Json<Terms>,
    pub region: String,
    pub instruments: Vec<String>,
    pub additional_terms: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: DealStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a deal. The deal type is derived from the terms tag.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDeal {
    pub title: String,
    pub description: String,
    pub terms: Terms,
    pub region: String,
    #[serde(default)]
    pub instruments: Vec<String>,
    pub additional_terms: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an open deal without bids.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub terms: Option<Terms>,
    pub region: Option<String>,
    pub instruments: Option<Vec<String>>,
    pub additional_terms: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Filter for bidder-facing deal listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealFilter {
    pub region: Option<String>,
    pub deal_type: Option<DealType>,
    #[serde(default)]
    pub instruments: Vec<String>,
}

/// Bidder-facing view of a deal. Carries no requester identity: parties stay
/// anonymous until a bid is accepted and a connection reveals them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DealListing {
    pub id: DealId,
    pub title: String,
    pub description: String,
    pub deal_type: DealType,
    pub terms: Json<Terms>,
    pub region: String,
    pub instruments: Vec<String>,
    pub additional_terms: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: DealStatus,
    pub bid_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A requester's own deal with its bid count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DealWithBidCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deal: Deal,
    pub bid_count: i64,
}

const LISTING_COLUMNS: &str = "d.id, d.title, d.description, d.deal_type, d.terms, d.region, \
     d.instruments, d.additional_terms, d.expires_at, d.status, \
     (SELECT COUNT(*) FROM bids b WHERE b.deal_id = d.id) AS bid_count, d.created_at";

// =============================================================================
// Deal Queries
// =============================================================================

impl Deal {
    /// Insert a new deal in open status.
    pub async fn create<'e>(
        requester_id: PartyId,
        new_deal: &NewDeal,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                id, requester_id, title, description, deal_type, terms,
                region, instruments, additional_terms, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(DealId::new())
        .bind(requester_id)
        .bind(&new_deal.title)
        .bind(&new_deal.description)
        .bind(new_deal.terms.deal_type())
        .bind(Json(&new_deal.terms))
        .bind(&new_deal.region)
        .bind(&new_deal.instruments)
        .bind(&new_deal.additional_terms)
        .bind(new_deal.expires_at)
        .fetch_one(executor)
        .await?;
        Ok(deal)
    }

    /// Find deal by ID
    pub async fn find_by_id<'e>(
        id: DealId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find deal by ID and take the aggregate row lock.
    ///
    /// Every multi-record transition on a deal aggregate acquires this lock
    /// first, so concurrent writers serialize and re-read fresh statuses.
    pub async fn lock_by_id(
        id: DealId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Transition the deal's status.
    pub async fn set_status<'e>(
        id: DealId,
        status: DealStatus,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await
    }

    /// Apply a partial update. Absent fields keep their current value.
    pub async fn apply_patch<'e>(
        id: DealId,
        patch: &DealPatch,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                deal_type = COALESCE($4, deal_type),
                terms = COALESCE($5, terms),
                region = COALESCE($6, region),
                instruments = COALESCE($7, instruments),
                additional_terms = COALESCE($8, additional_terms),
                expires_at = COALESCE($9, expires_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.terms.as_ref().map(|t| t.deal_type()))
        .bind(patch.terms.as_ref().map(Json))
        .bind(&patch.region)
        .bind(&patch.instruments)
        .bind(&patch.additional_terms)
        .bind(patch.expires_at)
        .fetch_one(executor)
        .await
    }

    /// Find all deals posted by a requester, newest first, with bid counts.
    pub async fn find_by_requester(
        requester_id: PartyId,
        pool: &PgPool,
    ) -> Result<Vec<DealWithBidCount>, sqlx::Error> {
        sqlx::query_as::<_, DealWithBidCount>(
            r#"
            SELECT d.*, (SELECT COUNT(*) FROM bids b WHERE b.deal_id = d.id) AS bid_count
            FROM deals d
            WHERE d.requester_id = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(pool)
        .await
    }

    /// Bidder-facing listing of deals still accepting bids.
    ///
    /// Closed and cancelled deals are excluded, and the rows carry no
    /// requester identity.
    pub async fn list_open(
        filter: &DealFilter,
        pool: &PgPool,
    ) -> Result<Vec<DealListing>, sqlx::Error> {
        let mut qb = sqlx::QueryBuilder::new(format!(
            "SELECT {} FROM deals d WHERE d.status IN ('open', 'in_negotiation')",
            LISTING_COLUMNS
        ));
        if let Some(region) = &filter.region {
            qb.push(" AND d.region = ");
            qb.push_bind(region);
        }
        if let Some(deal_type) = filter.deal_type {
            qb.push(" AND d.deal_type = ");
            qb.push_bind(deal_type);
        }
        if !filter.instruments.is_empty() {
            qb.push(" AND d.instruments && ");
            qb.push_bind(&filter.instruments);
        }
        qb.push(" ORDER BY d.created_at DESC");
        qb.build_query_as::<DealListing>().fetch_all(pool).await
    }

    /// Bidder-facing view of a single deal.
    pub async fn find_listing<'e>(
        id: DealId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<DealListing>, sqlx::Error> {
        sqlx::query_as::<_, DealListing>(&format!(
            "SELECT {} FROM deals d WHERE d.id = $1",
            LISTING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(DealStatus::Closed.is_terminal());
        assert!(DealStatus::Cancelled.is_terminal());
        assert!(!DealStatus::Open.is_terminal());
        assert!(!DealStatus::InNegotiation.is_terminal());
    }

    #[test]
    fn test_transition_matrix() {
        use DealStatus::*;

        assert!(Open.can_transition_to(InNegotiation));
        assert!(Open.can_transition_to(Cancelled));
        assert!(InNegotiation.can_transition_to(Closed));
        assert!(InNegotiation.can_transition_to(Cancelled));

        // No path skips negotiation, and terminal states are frozen
        assert!(!Open.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Open));
        assert!(!Closed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Open));
        assert!(!Cancelled.can_transition_to(InNegotiation));
        assert!(!InNegotiation.can_transition_to(Open));
    }

    #[test]
    fn test_accepts_bids() {
        assert!(DealStatus::Open.accepts_bids());
        assert!(DealStatus::InNegotiation.accepts_bids());
        assert!(!DealStatus::Closed.accepts_bids());
        assert!(!DealStatus::Cancelled.accepts_bids());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            DealStatus::Open,
            DealStatus::InNegotiation,
            DealStatus::Closed,
            DealStatus::Cancelled,
        ] {
            let parsed: DealStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
