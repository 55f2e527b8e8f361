//! The Matrix - Central shared state for the XMPP server.
//!
//! Holds the local domains, the storage gateway, connected sessions and the
//! per-account write locks. Every handler reaches shared state through it.

use slxmpp_proto::{Element, Jid};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::error::HandlerError;
use crate::routing::RemoteRouter;
use crate::storage::Storage;

use super::locks::AddressLocks;
use super::session::{Session, SessionRegistry};

/// This server's identity.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    /// Hosted domains, normalized.
    pub domains: HashSet<String>,
}

/// Everything needed to build a [`Matrix`].
pub struct MatrixParams<'a> {
    pub config: &'a Config,
    pub storage: Arc<dyn Storage>,
    pub router: Arc<dyn RemoteRouter>,
}

/// The Matrix - Central shared state container.
pub struct Matrix {
    pub server_info: ServerInfo,
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionRegistry,
    pub locks: AddressLocks,
    pub router: Arc<dyn RemoteRouter>,
    /// Outbound queue depth for new sessions.
    session_queue: usize,
}

impl Matrix {
    pub fn new(params: MatrixParams<'_>) -> Self {
        let MatrixParams {
            config,
            storage,
            router,
        } = params;
        Self {
            server_info: ServerInfo {
                name: config.server.name.clone(),
                domains: config
                    .server
                    .domains
                    .iter()
                    .filter_map(|d| Jid::parse(d).ok())
                    .map(|j| j.domain().to_owned())
                    .collect(),
            },
            storage,
            sessions: SessionRegistry::new(),
            locks: AddressLocks::new(),
            router,
            session_queue: config.limits.session_queue,
        }
    }

    /// Whether `jid` belongs to a domain hosted here.
    pub fn is_local(&self, jid: &Jid) -> bool {
        self.server_info.domains.contains(jid.domain())
    }

    /// Bind a resource for an existing local account.
    ///
    /// The returned receiver yields every stanza written to the session.
    pub async fn open_session(
        &self,
        jid: Jid,
    ) -> Result<(Arc<Session>, mpsc::Receiver<Element>), HandlerError> {
        let bare = jid.bare();
        let user = self
            .storage
            .find_user(&bare)
            .await?
            .ok_or(HandlerError::UnknownAccount(bare))?;
        let (session, rx) = Session::channel(jid, user, self.session_queue);
        self.sessions.register(session.clone());
        info!(session = %session.jid(), "Session bound");
        Ok((session, rx))
    }

    /// Unbind a resource.
    pub fn close_session(&self, jid: &Jid) {
        if self.sessions.unregister(jid).is_some() {
            info!(session = %jid, "Session closed");
        }
    }
}
