//! Alerts store port

use async_trait::async_trait;

use core_kernel::{AlertId, ClaimId, DomainPort, PortError};
use crate::alert::{AlertSeverity, AlertStatus, FraudAlert};

/// Conjunction of equality predicates for alert listings
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub claim_id: Option<ClaimId>,
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &FraudAlert) -> bool {
        self.claim_id.map_or(true, |id| alert.claim_id == id)
            && self.status.map_or(true, |s| alert.status == s)
            && self.severity.map_or(true, |s| alert.severity == s)
    }
}

/// Port for fraud alert persistence
#[async_trait]
pub trait AlertsPort: DomainPort {
    /// Single-entity lookup; absence is `Ok(None)`
    async fn get_alert(&self, id: AlertId) -> Result<Option<FraudAlert>, PortError>;

    /// Lists alerts matching the filter
    async fn list_alerts(&self, filter: AlertFilter) -> Result<Vec<FraudAlert>, PortError>;

    /// Persists a new alert
    async fn create_alert(&self, alert: &FraudAlert) -> Result<(), PortError>;

    /// Replaces the stored alert
    async fn update_alert(&self, alert: &FraudAlert) -> Result<(), PortError>;
}
