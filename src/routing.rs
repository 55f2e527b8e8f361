//! Delivery of stanzas addressed to other servers.

use async_trait::async_trait;
use slxmpp_proto::Element;
use tracing::debug;

/// Outbound path for stanzas whose recipient is not hosted here.
#[async_trait]
pub trait RemoteRouter: Send + Sync {
    async fn route(&self, stanza: Element);
}

/// Router used when no server-to-server link is configured.
///
/// Stanzas are dropped after being logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRouter;

#[async_trait]
impl RemoteRouter for LogRouter {
    async fn route(&self, stanza: Element) {
        debug!(
            to = stanza.attr("to").unwrap_or_default(),
            name = stanza.name(),
            "No remote route, stanza dropped"
        );
    }
}
