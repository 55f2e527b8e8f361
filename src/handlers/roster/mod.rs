//! Roster management handlers (`jabber:iq:roster`).
//!
//! # Reference
//! - RFC 6121 §2: Managing the Roster

mod notify;
mod push;
mod query;
mod remove;
mod update;

pub use push::push_roster_item;

use async_trait::async_trait;
use slxmpp_proto::{Iq, IqType};

use crate::handlers::{Context, Handler, HandlerError, HandlerResult};

/// Handler for roster get and set requests.
pub struct RosterHandler;

#[async_trait]
impl Handler for RosterHandler {
    async fn handle(&self, ctx: &Context<'_>, iq: &Iq) -> HandlerResult {
        check_recipient(ctx, iq)?;
        match iq.kind {
            IqType::Get => query::roster_get(ctx, iq).await,
            IqType::Set => update::roster_set(ctx, iq).await,
            IqType::Result | IqType::Error => Ok(()),
        }
    }
}

/// A roster request may only be addressed to the requester's own account.
///
/// Any resource on `to` is ignored; only the account is compared.
fn check_recipient(ctx: &Context<'_>, iq: &Iq) -> HandlerResult {
    match iq.to_jid() {
        Ok(None) => Ok(()),
        Ok(Some(to)) if to.bare_eq(ctx.jid()) => Ok(()),
        Ok(Some(_)) => Err(HandlerError::Forbidden),
        Err(_) => Err(HandlerError::JidMalformed),
    }
}
