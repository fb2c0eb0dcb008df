//! Claims store port
//!
//! Defines the persistence surface the decisioning engines consume. The
//! backing document database is an external collaborator; `infra_memory`
//! ships the reference adapter.

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ClaimId, CustomerId, DomainPort, PortError, Subscription};
use crate::claim::{Claim, ClaimStatus, ClaimType};

/// Conjunction of equality predicates for claim listings
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<ClaimStatus>,
    pub claim_type: Option<ClaimType>,
    pub ordering: Option<ClaimOrdering>,
}

/// Supported orderings for claim listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOrdering {
    CreatedAtAsc,
    CreatedAtDesc,
}

impl ClaimFilter {
    pub fn for_customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Self::default()
        }
    }

    /// Whether the claim satisfies every set predicate
    pub fn matches(&self, claim: &Claim) -> bool {
        self.customer_id.map_or(true, |id| claim.customer.id == id)
            && self.status.map_or(true, |s| claim.status == s)
            && self.claim_type.map_or(true, |t| claim.claim_type == t)
    }
}

/// Callback invoked on pushed claim changes
pub type ClaimCallback = Arc<dyn Fn(&Claim) + Send + Sync>;

/// Port for claim persistence and real-time updates
#[async_trait]
pub trait ClaimsPort: DomainPort {
    /// Single-entity lookup; absence is `Ok(None)`, never an error
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Lists claims matching the filter
    async fn list_claims(&self, filter: ClaimFilter) -> Result<Vec<Claim>, PortError>;

    /// Persists a new claim
    async fn create_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Replaces the stored claim
    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Registers a push callback for claims matching the filter
    async fn subscribe_claims(
        &self,
        filter: ClaimFilter,
        callback: ClaimCallback,
    ) -> Result<Subscription, PortError>;
}
