//! Test session.
//!
//! Wraps a bound session and its outbound queue, sending stanzas through
//! the registry and asserting on what the server writes back.

use slxmpp_proto::{Element, ns};
use slxmppd::handlers::{Context, HandlerResult, Registry};
use slxmppd::state::{Matrix, Session};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::stanzas;

/// A test client session.
pub struct TestClient {
    pub session: Arc<Session>,
    rx: mpsc::Receiver<Element>,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    next_id: u32,
}

impl TestClient {
    pub fn new(
        session: Arc<Session>,
        rx: mpsc::Receiver<Element>,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            session,
            rx,
            matrix,
            registry,
            next_id: 0,
        }
    }

    /// A fresh request id.
    pub fn id(&mut self) -> String {
        self.next_id += 1;
        format!("{}-{}", self.session.jid().resource().unwrap_or("bare"), self.next_id)
    }

    /// Dispatch a stanza as if it arrived on this session.
    pub async fn send(&self, stanza: Element) -> HandlerResult {
        let ctx = Context::new(&self.session, &self.matrix);
        self.registry.dispatch_element(&ctx, &stanza).await
    }

    /// Receive a single stanza written to this session.
    pub async fn recv(&mut self) -> anyhow::Result<Element> {
        self.recv_timeout(Duration::from_secs(2)).await
    }

    /// Receive a stanza with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Element> {
        timeout(dur, self.rx.recv())
            .await?
            .ok_or_else(|| anyhow::anyhow!("session queue closed"))
    }

    /// Receive stanzas until the predicate returns true.
    #[allow(dead_code)]
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Element>>
    where
        F: FnMut(&Element) -> bool,
    {
        let mut stanzas = Vec::new();
        loop {
            let stanza = self.recv().await?;
            let done = predicate(&stanza);
            stanzas.push(stanza);
            if done {
                break;
            }
        }
        Ok(stanzas)
    }

    /// Everything already queued, without waiting.
    pub fn drain(&mut self) -> Vec<Element> {
        let mut stanzas = Vec::new();
        while let Ok(stanza) = self.rx.try_recv() {
            stanzas.push(stanza);
        }
        stanzas
    }

    /// Assert nothing is queued for this session.
    pub fn assert_silent(&mut self) {
        let pending = self.drain();
        assert!(
            pending.is_empty(),
            "{} received unexpected stanzas: {}",
            self.session.jid(),
            pending.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
        );
    }

    /// Fetch the roster; returns the `<query/>` of the result.
    pub async fn roster(&mut self) -> Element {
        let id = self.id();
        self.send(stanzas::roster_get(&id)).await.expect("roster get dispatched");
        let result = self.recv().await.expect("roster result");
        assert_eq!(result.attr("id"), Some(id.as_str()));
        assert_eq!(result.attr("type"), Some("result"));
        result
            .children_ns("query", ns::ROSTER)
            .next()
            .cloned()
            .expect("roster query in result")
    }

    /// Send a roster set carrying `items` and return the reply.
    pub async fn roster_set(&mut self, items: Vec<Element>) -> Element {
        let id = self.id();
        self.send(stanzas::roster_set(&id, items)).await.expect("roster set dispatched");
        let reply = self.recv().await.expect("roster set reply");
        assert_eq!(reply.attr("id"), Some(id.as_str()));
        reply
    }
}
