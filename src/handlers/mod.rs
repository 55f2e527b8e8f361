//! XMPP stanza handlers.
//!
//! This module contains the Handler trait and the registry that dispatches
//! incoming IQ requests to the handler for their route.

mod core;
mod roster;

pub use self::core::{Context, Handler, HandlerError, HandlerResult, Registry, RouteKey};
pub use roster::{RosterHandler, push_roster_item};
