//! Rules store port

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, RuleId};
use crate::rule::ClaimRule;

/// Port for rule persistence
///
/// Rules are administrator-managed configuration. Deletes are hard deletes;
/// there is no soft-delete state beyond `RuleStatus::Inactive`.
#[async_trait]
pub trait RulesPort: DomainPort {
    /// Single-entity lookup; absence is `Ok(None)`
    async fn get_rule(&self, id: RuleId) -> Result<Option<ClaimRule>, PortError>;

    /// Lists every rule, active or not
    async fn list_rules(&self) -> Result<Vec<ClaimRule>, PortError>;

    /// Persists a new rule
    async fn create_rule(&self, rule: &ClaimRule) -> Result<(), PortError>;

    /// Replaces the stored rule
    async fn update_rule(&self, rule: &ClaimRule) -> Result<(), PortError>;

    /// Hard delete
    async fn delete_rule(&self, id: RuleId) -> Result<(), PortError>;
}
