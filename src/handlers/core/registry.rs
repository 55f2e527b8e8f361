//! Stanza handler registry and dispatch.
//!
//! Routes are keyed by stanza kind, payload namespace and IQ type. The table
//! is built once in [`Registry::new`] and never changes afterwards.

use slxmpp_proto::{Element, Iq, IqType, ProtocolError, StanzaKind, ns};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

use super::context::{Context, Handler, HandlerError, HandlerResult};
use crate::handlers::roster::RosterHandler;
use crate::telemetry::{RequestTimer, spans};

/// Dispatch key: stanza kind, payload namespace and request type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub kind: StanzaKind,
    pub ns: String,
    pub iq_type: IqType,
}

impl RouteKey {
    pub fn iq(ns: &str, iq_type: IqType) -> Self {
        Self {
            kind: StanzaKind::Iq,
            ns: ns.to_owned(),
            iq_type,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind.as_str(), self.ns, self.iq_type)
    }
}

/// Registry of stanza handlers.
pub struct Registry {
    handlers: HashMap<RouteKey, Arc<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<RouteKey, Arc<dyn Handler>> = HashMap::new();

        let roster: Arc<dyn Handler> = Arc::new(RosterHandler);
        handlers.insert(RouteKey::iq(ns::ROSTER, IqType::Get), roster.clone());
        handlers.insert(RouteKey::iq(ns::ROSTER, IqType::Set), roster);

        Self { handlers }
    }

    /// Registered routes in display order.
    pub fn routes(&self) -> Vec<&RouteKey> {
        let mut routes: Vec<_> = self.handlers.keys().collect();
        routes.sort_by_key(|k| k.to_string());
        routes
    }

    /// Parse and dispatch a stanza received on the context's session.
    ///
    /// The sender address is always stamped from the session; a client
    /// supplied `from` is discarded. Only IQs are routed here.
    pub async fn dispatch_element(&self, ctx: &Context<'_>, el: &Element) -> HandlerResult {
        match StanzaKind::from_name(el.name()) {
            Some(StanzaKind::Iq) => {}
            Some(kind) => {
                debug!(kind = kind.as_str(), session = %ctx.jid(), "No route for stanza kind");
                return Ok(());
            }
            None => {
                return Err(ProtocolError::UnexpectedElement {
                    expected: "iq",
                    found: el.name().to_owned(),
                }
                .into());
            }
        }

        let stamped = el.clone().without_attr("from");
        let iq = Iq::from_element(&stamped)?.with_from(ctx.jid().clone());
        self.dispatch(ctx, &iq).await
    }

    /// Dispatch an IQ to the appropriate handler.
    ///
    /// Protocol errors are answered on the session and reported as success;
    /// infrastructure errors are returned to the caller.
    pub async fn dispatch(&self, ctx: &Context<'_>, iq: &Iq) -> HandlerResult {
        let key = RouteKey::iq(iq.payload_ns().unwrap_or_default(), iq.kind);
        let route = key.to_string();

        let Some(handler) = self.handlers.get(&key) else {
            crate::metrics::record_iq_error(&route, "service_unavailable");
            // Responses must never be answered with an error.
            if iq.kind.is_request() {
                let err = HandlerError::ServiceUnavailable(route);
                return self.reject(ctx, iq, err);
            }
            debug!(route = %route, id = %iq.id, "Unrouted response dropped");
            return Ok(());
        };

        let _timer = RequestTimer::new(&route);
        let result = handler.handle(ctx, iq).instrument(spans::iq(&route, iq)).await;

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                crate::metrics::record_iq_error(&route, e.error_code());
                self.reject(ctx, iq, e)
            }
        }
    }

    fn reject(&self, ctx: &Context<'_>, iq: &Iq, err: HandlerError) -> HandlerResult {
        match err.stanza_error() {
            Some(stanza_error) => {
                debug!(id = %iq.id, error = %err, condition = %stanza_error, "Request rejected");
                ctx.reply(stanza_error.to_iq(iq));
                Ok(())
            }
            None => {
                warn!(id = %iq.id, error = %err, "Request failed");
                Err(err)
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        let registry = Registry::new();
        let routes: Vec<String> = registry.routes().iter().map(|k| k.to_string()).collect();
        assert_eq!(routes, ["iq jabber:iq:roster get", "iq jabber:iq:roster set"]);
    }

    #[test]
    fn test_route_key_lookup_ignores_ownership() {
        let registry = Registry::new();
        let key = RouteKey::iq(&String::from("jabber:iq:roster"), IqType::Get);
        assert!(registry.handlers.contains_key(&key));
        assert!(!registry.handlers.contains_key(&RouteKey::iq(ns::ROSTER, IqType::Result)));
    }
}
