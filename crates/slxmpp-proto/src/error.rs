//! Error types for the XMPP protocol library.
//!
//! This module defines errors for address parsing, stanza envelope
//! validation, and roster item parsing.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// JID parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JidError {
    /// The address string was empty.
    #[error("empty address")]
    Empty,

    /// A `@` separator was present with nothing before it.
    #[error("empty node part")]
    EmptyNode,

    /// The domain part was missing.
    #[error("empty domain part")]
    EmptyDomain,

    /// A `/` separator was present with nothing after it.
    #[error("empty resource part")]
    EmptyResource,

    /// One of the parts exceeded the allowed length.
    #[error("address part too long: {actual} bytes (limit: {limit})")]
    TooLong {
        /// Actual part length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Prohibited character in the node part.
    #[error("invalid character in node: {0:?}")]
    InvalidNodeChar(char),

    /// Prohibited character in the domain part.
    #[error("invalid character in domain: {0:?}")]
    InvalidDomainChar(char),

    /// Prohibited character in the resource part.
    #[error("invalid character in resource: {0:?}")]
    InvalidResourceChar(char),
}

/// Top-level protocol errors for stanza envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The element is not the expected stanza kind.
    #[error("unexpected element <{found}>, expected <{expected}>")]
    UnexpectedElement {
        /// Element name that was expected.
        expected: &'static str,
        /// Element name that was found.
        found: String,
    },

    /// A required attribute was absent.
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),

    /// The stanza `type` attribute has an unknown value.
    #[error("unknown stanza type '{0}'")]
    UnknownType(String),

    /// A `get` or `set` IQ carried more than one payload child.
    #[error("request carries {0} payload elements, expected one")]
    MultiplePayloads(usize),

    /// An address attribute could not be parsed.
    #[error("invalid address in '{attr}': {source}")]
    InvalidAddress {
        /// Attribute that held the address.
        attr: &'static str,
        /// Underlying address error.
        #[source]
        source: JidError,
    },
}

/// Roster item parsing errors.
///
/// Each variant corresponds to one validation step of a roster set, in the
/// order the checks are made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The item has no `jid` attribute or it is empty.
    #[error("item address is empty")]
    EmptyJid,

    /// The item `jid` attribute does not parse.
    #[error("item address is malformed: {0}")]
    MalformedJid(#[source] JidError),

    /// The item address carries a resource.
    #[error("item address is not bare: {0}")]
    NotBare(String),

    /// The same group name appears twice after trimming.
    #[error("duplicate group: {0}")]
    DuplicateGroup(String),

    /// A group name is empty after trimming.
    #[error("empty group name")]
    EmptyGroup,

    /// The `subscription` attribute has an unknown value.
    #[error("unknown subscription state '{0}'")]
    UnknownSubscription(String),
}
