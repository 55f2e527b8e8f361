//! Account persistence.
//!
//! Handlers load and save whole [`User`] objects through the [`Storage`]
//! trait. Nothing is cached across requests; sessions keep their own copy,
//! refreshed after every successful save.

mod memory;

pub use memory::MemoryStorage;

use async_trait::async_trait;
use slxmpp_proto::Jid;
use thiserror::Error;

use crate::state::User;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected for {0}")]
    WriteRejected(Jid),
}

/// Persistence gateway for accounts.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load an account by address. The resource of `jid` is ignored.
    async fn find_user(&self, jid: &Jid) -> Result<Option<User>, StorageError>;

    /// Replace the stored account with `user`.
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;
}
