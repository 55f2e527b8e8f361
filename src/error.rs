//! Unified error handling for slxmppd.
//!
//! Handler errors split into two groups: protocol errors, which are answered
//! with a stanza error to the requester, and infrastructure errors, which are
//! handed back to the transport.

use slxmpp_proto::{Condition, ErrorType, ItemError, Jid, ProtocolError, StanzaError};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during stanza handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("recipient is not the requester")]
    Forbidden,

    #[error("no such roster item")]
    ItemNotFound,

    #[error("malformed address")]
    JidMalformed,

    #[error("operation not allowed on own address")]
    NotAllowed,

    #[error("not acceptable: {0}")]
    NotAcceptable(String),

    #[error("no handler for {0}")]
    ServiceUnavailable(String),

    #[error("malformed envelope: {0}")]
    Envelope(#[from] ProtocolError),

    #[error("unknown account: {0}")]
    UnknownAccount(Jid),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden => "forbidden",
            Self::ItemNotFound => "item_not_found",
            Self::JidMalformed => "jid_malformed",
            Self::NotAllowed => "not_allowed",
            Self::NotAcceptable(_) => "not_acceptable",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Envelope(_) => "envelope",
            Self::UnknownAccount(_) => "unknown_account",
            Self::Storage(_) => "storage",
        }
    }

    /// The stanza error to send back to the requester.
    ///
    /// Returns `None` for errors that belong to the transport.
    pub fn stanza_error(&self) -> Option<StanzaError> {
        let (condition, kind) = match self {
            Self::BadRequest(_) => (Condition::BadRequest, ErrorType::Modify),
            Self::Forbidden => (Condition::Forbidden, ErrorType::Auth),
            Self::ItemNotFound => (Condition::ItemNotFound, ErrorType::Modify),
            Self::JidMalformed => (Condition::JidMalformed, ErrorType::Modify),
            Self::NotAllowed => (Condition::NotAllowed, ErrorType::Modify),
            Self::NotAcceptable(_) => (Condition::NotAcceptable, ErrorType::Modify),
            Self::ServiceUnavailable(_) => (Condition::ServiceUnavailable, ErrorType::Cancel),

            Self::Envelope(_) => return None,
            Self::UnknownAccount(_) => return None,
            Self::Storage(_) => return None,
        };
        Some(StanzaError::new(condition, kind))
    }
}

impl From<ItemError> for HandlerError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::MalformedJid(_) => Self::JidMalformed,
            ItemError::EmptyGroup => Self::NotAcceptable(err.to_string()),
            ItemError::EmptyJid
            | ItemError::NotBare(_)
            | ItemError::DuplicateGroup(_)
            | ItemError::UnknownSubscription(_) => Self::BadRequest(err.to_string()),
        }
    }
}

/// Result type for stanza handlers.
pub type HandlerResult = Result<(), HandlerError>;
