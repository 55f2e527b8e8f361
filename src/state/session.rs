//! Connected client sessions.
//!
//! A [`Session`] is one bound resource. It caches the account's [`User`]
//! for the stream and owns the outbound queue the transport drains.

use dashmap::DashMap;
use parking_lot::RwLock;
use slxmpp_proto::{Element, Jid};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::user::User;

/// One bound resource of a local account.
#[derive(Debug)]
pub struct Session {
    jid: Jid,
    user: RwLock<User>,
    requested_roster: AtomicBool,
    tx: mpsc::Sender<Element>,
}

impl Session {
    /// Create a session with an outbound queue of `capacity` stanzas.
    pub fn channel(jid: Jid, user: User, capacity: usize) -> (Arc<Self>, mpsc::Receiver<Element>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let session = Arc::new(Self {
            jid,
            user: RwLock::new(user),
            requested_roster: AtomicBool::new(false),
            tx,
        });
        (session, rx)
    }

    /// The full address of this resource.
    pub fn jid(&self) -> &Jid {
        &self.jid
    }

    /// Snapshot of the cached account.
    pub fn user(&self) -> User {
        self.user.read().clone()
    }

    /// Whether this resource has fetched its roster and so receives pushes.
    pub fn requested_roster(&self) -> bool {
        self.requested_roster.load(Ordering::Acquire)
    }

    pub fn mark_requested_roster(&self) {
        self.requested_roster.store(true, Ordering::Release);
    }

    /// Queue a stanza without waiting.
    ///
    /// Returns `false` when the queue is full or the transport has gone.
    pub fn write(&self, stanza: Element) -> bool {
        match self.tx.try_send(stanza) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(session = %self.jid, "Outbound queue full, stanza dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(session = %self.jid, "Session closed, stanza dropped");
                false
            }
        }
    }

    fn refresh_user(&self, user: &User) {
        self.user.write().update_from(user);
    }
}

/// Connected sessions, grouped by bare address.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<Jid, Vec<Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session. A previous session bound to the same full address is
    /// replaced.
    pub fn register(&self, session: Arc<Session>) {
        let mut resources = self.sessions.entry(session.jid().bare()).or_default();
        resources.retain(|s| s.jid() != session.jid());
        resources.push(session);
        drop(resources);
        crate::metrics::set_connected_sessions(self.count());
    }

    /// Remove the session bound to a full address.
    pub fn unregister(&self, jid: &Jid) -> Option<Arc<Session>> {
        let bare = jid.bare();
        let removed = {
            let mut resources = self.sessions.get_mut(&bare)?;
            let pos = resources.iter().position(|s| s.jid() == jid)?;
            resources.remove(pos)
        };
        self.sessions.remove_if(&bare, |_, resources| resources.is_empty());
        crate::metrics::set_connected_sessions(self.count());
        Some(removed)
    }

    /// Every session of an account.
    pub fn connected_resources(&self, jid: &Jid) -> Vec<Arc<Session>> {
        self.sessions
            .get(&jid.bare())
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// Sessions of an account that have requested the roster.
    pub fn interested_resources(&self, jid: &Jid) -> Vec<Arc<Session>> {
        self.sessions
            .get(&jid.bare())
            .map(|r| {
                r.iter()
                    .filter(|s| s.requested_roster())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Refresh the cached account on every session of `user`.
    pub fn update_user_streams(&self, user: &User) {
        for session in self.connected_resources(user.jid()) {
            session.refresh_user(user);
        }
    }

    /// Total connected sessions.
    pub fn count(&self) -> usize {
        self.sessions.iter().map(|r| r.value().len()).sum()
    }
}
