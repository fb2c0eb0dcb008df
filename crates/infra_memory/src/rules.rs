//! In-memory rule store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, RuleId};
use domain_rules::{ClaimRule, RulesPort};

/// Hash-map backed [`RulesPort`] adapter
#[derive(Default)]
pub struct MemoryRuleStore {
    rules: Mutex<HashMap<RuleId, ClaimRule>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<RuleId, ClaimRule>>, PortError> {
        self.rules
            .lock()
            .map_err(|_: PoisonError<_>| PortError::internal("rule store lock poisoned"))
    }
}

impl DomainPort for MemoryRuleStore {}

#[async_trait]
impl RulesPort for MemoryRuleStore {
    async fn get_rule(&self, id: RuleId) -> Result<Option<ClaimRule>, PortError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list_rules(&self) -> Result<Vec<ClaimRule>, PortError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn create_rule(&self, rule: &ClaimRule) -> Result<(), PortError> {
        self.lock()?.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn update_rule(&self, rule: &ClaimRule) -> Result<(), PortError> {
        let mut rules = self.lock()?;
        if !rules.contains_key(&rule.id) {
            return Err(PortError::not_found("ClaimRule", rule.id));
        }
        rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn delete_rule(&self, id: RuleId) -> Result<(), PortError> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("ClaimRule", id))
    }
}
