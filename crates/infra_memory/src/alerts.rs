//! In-memory fraud alert store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use core_kernel::{AlertId, DomainPort, PortError};
use domain_fraud::{AlertFilter, AlertsPort, FraudAlert};

/// Hash-map backed [`AlertsPort`] adapter
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: Mutex<HashMap<AlertId, FraudAlert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AlertId, FraudAlert>>, PortError> {
        self.alerts
            .lock()
            .map_err(|_: PoisonError<_>| PortError::internal("alert store lock poisoned"))
    }
}

impl DomainPort for MemoryAlertStore {}

#[async_trait]
impl AlertsPort for MemoryAlertStore {
    async fn get_alert(&self, id: AlertId) -> Result<Option<FraudAlert>, PortError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list_alerts(&self, filter: AlertFilter) -> Result<Vec<FraudAlert>, PortError> {
        let mut alerts: Vec<FraudAlert> = self
            .lock()?
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.detected_at);
        Ok(alerts)
    }

    async fn create_alert(&self, alert: &FraudAlert) -> Result<(), PortError> {
        self.lock()?.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn update_alert(&self, alert: &FraudAlert) -> Result<(), PortError> {
        let mut alerts = self.lock()?;
        if !alerts.contains_key(&alert.id) {
            return Err(PortError::not_found("FraudAlert", alert.id));
        }
        alerts.insert(alert.id, alert.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ClaimId;
    use domain_fraud::{AlertStatus, AlertType};

    fn alert(score: f64) -> FraudAlert {
        FraudAlert::new(
            ClaimId::new(),
            "HVC-0000000001",
            AlertType::UnusualAmount,
            score,
            vec![],
        )
    }

    #[tokio::test]
    async fn test_filter_by_status() {
        let store = MemoryAlertStore::new();
        let open = alert(45.0);
        let mut investigating = alert(75.0);
        investigating
            .update_status(AlertStatus::Investigating)
            .unwrap();
        store.create_alert(&open).await.unwrap();
        store.create_alert(&investigating).await.unwrap();

        let filter = AlertFilter {
            status: Some(AlertStatus::Open),
            ..AlertFilter::default()
        };
        let listed = store.list_alerts(filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, open.id);
    }

    #[tokio::test]
    async fn test_update_missing_alert_is_not_found() {
        let store = MemoryAlertStore::new();
        let result = store.update_alert(&alert(50.0)).await;
        assert!(matches!(result, Err(PortError::NotFound { .. })));
    }
}
