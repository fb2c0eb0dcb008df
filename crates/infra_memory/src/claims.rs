//! In-memory claim store
//!
//! Backs [`ClaimsPort`] with a hash map and a callback registry. Writes
//! notify every live subscriber whose filter matches the written claim,
//! mirroring the push feed a document database would provide.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{ClaimId, DomainPort, PortError, Subscription};
use domain_claims::{Claim, ClaimCallback, ClaimFilter, ClaimOrdering, ClaimsPort};

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
) -> Result<MutexGuard<'a, T>, PortError> {
    mutex
        .lock()
        .map_err(|_: PoisonError<_>| PortError::internal("claim store lock poisoned"))
}

#[derive(Default)]
struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, (ClaimFilter, ClaimCallback)>>,
}

/// Hash-map backed [`ClaimsPort`] adapter
#[derive(Default)]
pub struct MemoryClaimStore {
    claims: Mutex<HashMap<ClaimId, Claim>>,
    subscribers: Arc<Subscribers>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every subscriber whose filter matches the claim
    fn notify(&self, claim: &Claim) -> Result<(), PortError> {
        let entries = lock(&self.subscribers.entries)?;
        for (filter, callback) in entries.values() {
            if filter.matches(claim) {
                callback(claim);
            }
        }
        Ok(())
    }
}

impl DomainPort for MemoryClaimStore {}

#[async_trait]
impl ClaimsPort for MemoryClaimStore {
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        Ok(lock(&self.claims)?.get(&id).cloned())
    }

    async fn list_claims(&self, filter: ClaimFilter) -> Result<Vec<Claim>, PortError> {
        let mut claims: Vec<Claim> = lock(&self.claims)?
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        match filter.ordering {
            Some(ClaimOrdering::CreatedAtAsc) => claims.sort_by_key(|c| c.created_at),
            Some(ClaimOrdering::CreatedAtDesc) => {
                claims.sort_by_key(|c| std::cmp::Reverse(c.created_at))
            }
            None => {}
        }
        Ok(claims)
    }

    async fn create_claim(&self, claim: &Claim) -> Result<(), PortError> {
        lock(&self.claims)?.insert(claim.id, claim.clone());
        debug!(claim_id = %claim.id, "claim created");
        self.notify(claim)
    }

    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
        let mut claims = lock(&self.claims)?;
        if !claims.contains_key(&claim.id) {
            return Err(PortError::not_found("Claim", claim.id));
        }
        claims.insert(claim.id, claim.clone());
        drop(claims);
        self.notify(claim)
    }

    async fn subscribe_claims(
        &self,
        filter: ClaimFilter,
        callback: ClaimCallback,
    ) -> Result<Subscription, PortError> {
        let id = self.subscribers.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.subscribers.entries)?.insert(id, (filter, callback));

        let subscribers = Arc::clone(&self.subscribers);
        Ok(Subscription::new(move || {
            if let Ok(mut entries) = subscribers.entries.lock() {
                entries.remove(&id);
            }
        }))
    }
}
