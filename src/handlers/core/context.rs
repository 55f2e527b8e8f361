//! Handler context and the handler trait.

use async_trait::async_trait;
use slxmpp_proto::{Element, Iq, Jid};
use std::sync::Arc;

use crate::state::{Matrix, Session, User};

pub use crate::error::{HandlerError, HandlerResult};

/// Handler context passed to each stanza handler.
pub struct Context<'a> {
    /// The requesting session.
    pub session: &'a Arc<Session>,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a Arc<Session>, matrix: &'a Arc<Matrix>) -> Self {
        Self { session, matrix }
    }

    /// Full address of the requester.
    pub fn jid(&self) -> &Jid {
        self.session.jid()
    }

    /// Account address of the requester.
    pub fn bare_jid(&self) -> Jid {
        self.session.jid().bare()
    }

    /// Queue a stanza for the requester.
    pub fn reply(&self, stanza: Element) -> bool {
        self.session.write(stanza)
    }

    /// Load the requester's account from storage.
    pub async fn load_user(&self) -> Result<User, HandlerError> {
        let bare = self.bare_jid();
        self.matrix
            .storage
            .find_user(&bare)
            .await?
            .ok_or(HandlerError::UnknownAccount(bare))
    }
}

/// Handler for one dispatch route.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>, iq: &Iq) -> HandlerResult;
}
