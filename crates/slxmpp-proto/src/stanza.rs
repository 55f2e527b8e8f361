//! Stanza envelopes: IQ and presence.
//!
//! # Reference
//! - RFC 6120 §8: XML Stanzas

use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{JidError, ProtocolError, Result};
use crate::jid::Jid;

/// Top-level stanza kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StanzaKind {
    /// `<iq/>` request/response.
    Iq,
    /// `<message/>` push.
    Message,
    /// `<presence/>` broadcast.
    Presence,
}

impl StanzaKind {
    /// Classify an element by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "iq" => Some(Self::Iq),
            "message" => Some(Self::Message),
            "presence" => Some(Self::Presence),
            _ => None,
        }
    }

    /// Element name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iq => "iq",
            Self::Message => "message",
            Self::Presence => "presence",
        }
    }
}

/// The `type` attribute of an IQ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IqType {
    /// Request for information.
    Get,
    /// Request to change state.
    Set,
    /// Successful response.
    Result,
    /// Failed response.
    Error,
}

impl IqType {
    /// Wire value of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Result => "result",
            Self::Error => "error",
        }
    }

    /// Returns `true` for `get` and `set`.
    pub fn is_request(self) -> bool {
        matches!(self, Self::Get | Self::Set)
    }
}

impl FromStr for IqType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Self::Get),
            "set" => Ok(Self::Set),
            "result" => Ok(Self::Result),
            "error" => Ok(Self::Error),
            other => Err(ProtocolError::UnknownType(other.to_owned())),
        }
    }
}

impl fmt::Display for IqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed IQ stanza.
///
/// `from` is stamped by the server and is always a valid address; `to`
/// comes from the client and is kept raw so handlers can decide how to
/// report a malformed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Iq {
    /// Request identifier, echoed in the response.
    pub id: String,
    /// IQ type.
    pub kind: IqType,
    /// Sender address.
    pub from: Option<Jid>,
    /// Raw recipient address.
    pub to: Option<String>,
    /// The payload child, if any.
    pub payload: Option<Element>,
}

impl Iq {
    /// Create a request IQ.
    pub fn new(id: impl Into<String>, kind: IqType) -> Self {
        Self {
            id: id.into(),
            kind,
            from: None,
            to: None,
            payload: None,
        }
    }

    /// Set the sender.
    pub fn with_from(mut self, from: Jid) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the raw recipient.
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: Element) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Parse an IQ from an element.
    ///
    /// A `get` or `set` must carry at most one payload child; more is a
    /// [`ProtocolError::MultiplePayloads`]. Responses keep their first child
    /// other than `<error/>` as the payload.
    pub fn from_element(el: &Element) -> Result<Self> {
        if el.name() != "iq" {
            return Err(ProtocolError::UnexpectedElement {
                expected: "iq",
                found: el.name().to_owned(),
            });
        }

        let id = el.attr("id").ok_or(ProtocolError::MissingAttribute("id"))?;
        let kind: IqType = el
            .attr("type")
            .ok_or(ProtocolError::MissingAttribute("type"))?
            .parse()?;
        let from = el
            .attr("from")
            .map(Jid::parse)
            .transpose()
            .map_err(|source| ProtocolError::InvalidAddress {
                attr: "from",
                source,
            })?;

        let payload = if kind.is_request() {
            match el.children() {
                [] => None,
                [payload] => Some(payload.clone()),
                extra => return Err(ProtocolError::MultiplePayloads(extra.len())),
            }
        } else {
            el.children().iter().find(|c| c.name() != "error").cloned()
        };

        Ok(Self {
            id: id.to_owned(),
            kind,
            from,
            to: el.attr("to").map(str::to_owned),
            payload,
        })
    }

    /// Parse the `to` attribute.
    ///
    /// Blank values are treated as absent.
    pub fn to_jid(&self) -> std::result::Result<Option<Jid>, JidError> {
        match self.to.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(to) => Jid::parse(to).map(Some),
        }
    }

    /// Namespace of the payload, if any.
    pub fn payload_ns(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Element::ns)
    }

    /// Render this IQ as an element.
    pub fn to_element(&self) -> Element {
        let el = Element::new("iq")
            .with_attr("id", self.id.as_str())
            .with_attr("type", self.kind.as_str())
            .with_opt_attr("from", self.from.as_ref().map(Jid::to_string))
            .with_opt_attr("to", self.to.as_deref());
        match &self.payload {
            Some(payload) => el.with_child(payload.clone()),
            None => el,
        }
    }

    /// Build the empty success response to this request.
    ///
    /// Echoes the id, addresses the original sender and never carries a
    /// `from` attribute.
    pub fn result(&self) -> Element {
        Element::new("iq")
            .with_attr("id", self.id.as_str())
            .with_attr("type", IqType::Result.as_str())
            .with_opt_attr("to", self.from.as_ref().map(Jid::to_string))
    }
}

/// The `type` attribute of a presence stanza.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresenceType {
    /// The sender is no longer available.
    Unavailable,
    /// Request a subscription to the recipient's presence.
    Subscribe,
    /// Approve a subscription request.
    Subscribed,
    /// Cancel the sender's subscription to the recipient.
    Unsubscribe,
    /// Revoke the recipient's subscription to the sender.
    Unsubscribed,
    /// Request the recipient's current presence.
    Probe,
}

impl PresenceType {
    /// Wire value of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Subscribe => "subscribe",
            Self::Subscribed => "subscribed",
            Self::Unsubscribe => "unsubscribe",
            Self::Unsubscribed => "unsubscribed",
            Self::Probe => "probe",
        }
    }
}

impl fmt::Display for PresenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a typed presence stanza.
pub fn presence(from: &Jid, to: &Jid, kind: PresenceType, id: &str) -> Element {
    Element::new("presence")
        .with_attr("from", from.to_string())
        .with_attr("id", id)
        .with_attr("to", to.to_string())
        .with_attr("type", kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns;

    fn jid(s: &str) -> Jid {
        Jid::parse(s).unwrap()
    }

    #[test]
    fn test_iq_from_element() {
        let el = Element::new("iq")
            .with_attr("id", "42")
            .with_attr("type", "get")
            .with_attr("from", "alice@wonderland.lit/tea")
            .with_child(Element::with_ns("query", ns::ROSTER));
        let iq = Iq::from_element(&el).unwrap();
        assert_eq!(iq.id, "42");
        assert_eq!(iq.kind, IqType::Get);
        assert_eq!(iq.from, Some(jid("alice@wonderland.lit/tea")));
        assert_eq!(iq.payload_ns(), Some(ns::ROSTER));
        assert_eq!(iq.to_element(), el);
    }

    #[test]
    fn test_request_with_two_payloads_rejected() {
        let el = Element::new("iq")
            .with_attr("id", "2")
            .with_attr("type", "set")
            .with_child(Element::with_ns("query", ns::ROSTER))
            .with_child(Element::with_ns("query", "jabber:iq:version"));
        assert_eq!(Iq::from_element(&el), Err(ProtocolError::MultiplePayloads(2)));
    }

    #[test]
    fn test_error_response_payload_skips_error_child() {
        let el = Element::new("iq")
            .with_attr("id", "3")
            .with_attr("type", "error")
            .with_child(Element::new("error").with_attr("type", "cancel"))
            .with_child(Element::with_ns("query", ns::ROSTER));
        let iq = Iq::from_element(&el).unwrap();
        assert_eq!(iq.payload_ns(), Some(ns::ROSTER));
    }

    #[test]
    fn test_iq_envelope_errors() {
        let missing_id = Element::new("iq").with_attr("type", "get");
        assert_eq!(
            Iq::from_element(&missing_id),
            Err(ProtocolError::MissingAttribute("id"))
        );

        let bad_type = Element::new("iq").with_attr("id", "1").with_attr("type", "poke");
        assert_eq!(
            Iq::from_element(&bad_type),
            Err(ProtocolError::UnknownType("poke".into()))
        );

        let wrong = Element::new("message");
        assert!(matches!(
            Iq::from_element(&wrong),
            Err(ProtocolError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_to_jid() {
        let iq = Iq::new("1", IqType::Set);
        assert_eq!(iq.to_jid(), Ok(None));
        assert_eq!(iq.clone().with_to("  ").to_jid(), Ok(None));
        assert_eq!(
            iq.clone().with_to("alice@wonderland.lit").to_jid(),
            Ok(Some(jid("alice@wonderland.lit")))
        );
        assert!(iq.with_to("@wonderland.lit").to_jid().is_err());
    }

    #[test]
    fn test_result_has_no_from() {
        let iq = Iq::new("abc", IqType::Set)
            .with_from(jid("alice@wonderland.lit/tea"))
            .with_to("alice@wonderland.lit");
        let result = iq.result();
        assert_eq!(
            result.to_string(),
            r#"<iq id="abc" type="result" to="alice@wonderland.lit/tea"/>"#
        );
        assert_eq!(result.attr("from"), None);
    }

    #[test]
    fn test_presence() {
        let p = presence(
            &jid("alice@wonderland.lit"),
            &jid("hatter@wonderland.lit"),
            PresenceType::Unsubscribed,
            "p1",
        );
        assert_eq!(
            p.to_string(),
            r#"<presence from="alice@wonderland.lit" id="p1" to="hatter@wonderland.lit" type="unsubscribed"/>"#
        );
    }
}
