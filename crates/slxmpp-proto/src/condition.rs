//! Stanza error conditions.
//!
//! # Reference
//! - RFC 6120 §8.3: Stanza Errors

use std::fmt;

use crate::element::Element;
use crate::jid::Jid;
use crate::ns;
use crate::stanza::{Iq, IqType};

/// The `type` attribute of an `<error/>` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Retry after providing credentials.
    Auth,
    /// Do not retry.
    Cancel,
    /// Retry after changing the data sent.
    Modify,
    /// Retry after waiting.
    Wait,
}

impl ErrorType {
    /// Wire value of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Cancel => "cancel",
            Self::Modify => "modify",
            Self::Wait => "wait",
        }
    }
}

/// Defined stanza error conditions used by this server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `<bad-request/>`
    BadRequest,
    /// `<forbidden/>`
    Forbidden,
    /// `<item-not-found/>`
    ItemNotFound,
    /// `<jid-malformed/>`
    JidMalformed,
    /// `<not-acceptable/>`
    NotAcceptable,
    /// `<not-allowed/>`
    NotAllowed,
    /// `<service-unavailable/>`
    ServiceUnavailable,
}

impl Condition {
    /// Element name of this condition.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Forbidden => "forbidden",
            Self::ItemNotFound => "item-not-found",
            Self::JidMalformed => "jid-malformed",
            Self::NotAcceptable => "not-acceptable",
            Self::NotAllowed => "not-allowed",
            Self::ServiceUnavailable => "service-unavailable",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stanza error: a condition paired with its error type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StanzaError {
    /// The defined condition.
    pub condition: Condition,
    /// How the sender may recover.
    pub kind: ErrorType,
}

impl StanzaError {
    /// Pair a condition with an error type.
    pub const fn new(condition: Condition, kind: ErrorType) -> Self {
        Self { condition, kind }
    }

    /// The `<error/>` child element.
    pub fn error_element(&self) -> Element {
        Element::new("error")
            .with_attr("type", self.kind.as_str())
            .with_child(Element::with_ns(self.condition.as_str(), ns::STANZAS))
    }

    /// Build the error response to an IQ request.
    ///
    /// Echoes the id and the original payload, swaps the addresses and
    /// appends the `<error/>` element.
    pub fn to_iq(&self, request: &Iq) -> Element {
        let el = Element::new("iq")
            .with_attr("id", request.id.as_str())
            .with_attr("type", IqType::Error.as_str())
            .with_opt_attr("from", request.to.as_deref())
            .with_opt_attr("to", request.from.as_ref().map(Jid::to_string));
        let el = match &request.payload {
            Some(payload) => el.with_child(payload.clone()),
            None => el,
        };
        el.with_child(self.error_element())
    }
}

impl fmt::Display for StanzaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.condition, self.kind.as_str())
    }
}
