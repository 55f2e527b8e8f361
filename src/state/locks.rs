//! Per-account write serialization.
//!
//! Roster updates are read-modify-write cycles against storage. Every
//! mutation of an account's roster runs while holding that account's lock,
//! so two concurrent updates cannot both start from the same snapshot.
//! Flows that touch two accounts take both locks in address order.

use dashmap::DashMap;
use slxmpp_proto::Jid;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Idle entries are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Async mutexes keyed by bare address.
#[derive(Debug, Default)]
pub struct AddressLocks {
    locks: DashMap<Jid, Arc<Mutex<()>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, jid: &Jid) -> Arc<Mutex<()>> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune();
        }
        self.locks.entry(jid.bare()).or_default().value().clone()
    }

    /// Wait for exclusive access to one account.
    pub async fn lock(&self, jid: &Jid) -> OwnedMutexGuard<()> {
        self.handle(jid).lock_owned().await
    }

    /// Wait for exclusive access to several accounts.
    ///
    /// Addresses are deduplicated and locked in sorted order.
    pub async fn lock_all(&self, jids: &[Jid]) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered: Vec<Jid> = jids.iter().map(Jid::bare).collect();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for jid in &ordered {
            guards.push(self.handle(jid).lock_owned().await);
        }
        guards
    }

    /// Drop entries nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
