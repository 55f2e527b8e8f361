//! Test server management.
//!
//! Builds the shared state and dispatch table in-process, backed by a
//! [`MemoryStorage`] the tests can inspect and sabotage.

use slxmpp_proto::Jid;
use slxmppd::config::Config;
use slxmppd::handlers::Registry;
use slxmppd::routing::RemoteRouter;
use slxmppd::state::{Matrix, MatrixParams, User};
use slxmppd::storage::{MemoryStorage, Storage};
use std::sync::Arc;

use super::client::TestClient;

/// A test server instance.
pub struct TestServer {
    pub matrix: Arc<Matrix>,
    pub registry: Arc<Registry>,
    pub storage: Arc<MemoryStorage>,
}

impl TestServer {
    /// A server hosting `wonderland.lit` with the given accounts.
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self::with_router(accounts, Arc::new(slxmppd::routing::LogRouter))
    }

    /// Same as [`TestServer::with_accounts`] with a custom remote router.
    pub fn with_router(accounts: &[&str], router: Arc<dyn RemoteRouter>) -> Self {
        let config: Config = toml::from_str(
            r#"
[server]
name = "xmpp.wonderland.lit"
domains = ["wonderland.lit"]

[limits]
session_queue = 64
"#,
        )
        .expect("test config parses");

        let storage = Arc::new(MemoryStorage::with_users(
            accounts.iter().map(|a| User::new(&jid(a))),
        ));
        let matrix = Arc::new(Matrix::new(MatrixParams {
            config: &config,
            storage: storage.clone(),
            router,
        }));

        Self {
            matrix,
            registry: Arc::new(Registry::new()),
            storage,
        }
    }

    /// Bind a session for `full_jid`.
    pub async fn connect(&self, full_jid: &str) -> TestClient {
        let (session, rx) = self
            .matrix
            .open_session(jid(full_jid))
            .await
            .expect("account exists");
        TestClient::new(session, rx, self.matrix.clone(), self.registry.clone())
    }

    /// Bind a session and fetch the roster so it receives pushes.
    pub async fn connect_interested(&self, full_jid: &str) -> TestClient {
        let mut client = self.connect(full_jid).await;
        client.roster().await;
        client
    }

    /// The stored copy of an account.
    pub async fn stored(&self, account: &str) -> User {
        self.storage
            .find_user(&jid(account))
            .await
            .expect("storage available")
            .expect("account exists")
    }

    /// Replace the stored copy of an account.
    pub fn seed(&self, user: User) {
        self.storage.seed([user]);
    }
}

pub fn jid(s: &str) -> Jid {
    Jid::parse(s).expect("valid test address")
}
