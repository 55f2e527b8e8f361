//! In-memory account store.

use async_trait::async_trait;
use parking_lot::RwLock;
use slxmpp_proto::Jid;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::{Storage, StorageError};
use crate::state::{User, UserRecord};

/// HashMap-backed [`Storage`].
///
/// Accounts are held as [`UserRecord`]s, so every load hands out a fresh
/// copy. Saves for selected addresses can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    users: RwLock<HashMap<Jid, UserRecord>>,
    failing: RwLock<HashSet<Jid>>,
    saves: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given accounts.
    pub fn with_users<I: IntoIterator<Item = User>>(users: I) -> Self {
        let storage = Self::new();
        storage.seed(users);
        storage
    }

    /// Insert accounts directly, bypassing the save counter.
    pub fn seed<I: IntoIterator<Item = User>>(&self, users: I) {
        let mut map = self.users.write();
        for user in users {
            map.insert(user.jid().clone(), user.to_record());
        }
    }

    /// Reject every later save of `jid`.
    pub fn fail_saves_for(&self, jid: &Jid) {
        self.failing.write().insert(jid.bare());
    }

    /// Accept saves of `jid` again.
    pub fn restore_saves_for(&self, jid: &Jid) {
        self.failing.write().remove(&jid.bare());
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_user(&self, jid: &Jid) -> Result<Option<User>, StorageError> {
        let record = self.users.read().get(&jid.bare()).cloned();
        Ok(record.map(User::from_record))
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        if self.failing.read().contains(user.jid()) {
            return Err(StorageError::WriteRejected(user.jid().clone()));
        }
        self.users
            .write()
            .insert(user.jid().clone(), user.to_record());
        self.saves.fetch_add(1, Ordering::Relaxed);
        debug!(user = %user.jid(), contacts = user.roster_len(), "Account saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jid(s: &str) -> Jid {
        Jid::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_find_returns_independent_copies() {
        let storage = MemoryStorage::with_users([User::new(&jid("alice@wonderland.lit"))]);
        let mut first = storage
            .find_user(&jid("alice@wonderland.lit/tea"))
            .await
            .unwrap()
            .unwrap();
        first.follower_entry(&jid("hatter@wonderland.lit"));

        let second = storage
            .find_user(&jid("alice@wonderland.lit"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.roster_len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let storage = MemoryStorage::new();
        assert!(storage.find_user(&jid("nobody@wonderland.lit")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let storage = MemoryStorage::with_users([User::new(&jid("alice@wonderland.lit"))]);
        let mut user = storage
            .find_user(&jid("alice@wonderland.lit"))
            .await
            .unwrap()
            .unwrap();
        user.follower_entry(&jid("hatter@wonderland.lit")).subscribe_to();
        storage.save_user(&user).await.unwrap();

        let reloaded = storage
            .find_user(&jid("alice@wonderland.lit"))
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_subscribed_to(&jid("hatter@wonderland.lit")));
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_saves_for() {
        let alice = User::new(&jid("alice@wonderland.lit"));
        let storage = MemoryStorage::with_users([alice.clone()]);
        storage.fail_saves_for(&jid("alice@wonderland.lit/tea"));

        assert!(matches!(
            storage.save_user(&alice).await,
            Err(StorageError::WriteRejected(_))
        ));
        assert_eq!(storage.save_count(), 0);

        storage.restore_saves_for(&jid("alice@wonderland.lit"));
        storage.save_user(&alice).await.unwrap();
        assert_eq!(storage.save_count(), 1);
    }
}
