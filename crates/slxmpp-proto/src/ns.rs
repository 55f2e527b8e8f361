//! XML namespace constants.

/// Client-to-server stream content.
pub const CLIENT: &str = "jabber:client";

/// Roster management (RFC 6121 §2).
pub const ROSTER: &str = "jabber:iq:roster";

/// Stanza error conditions (RFC 6120 §8.3).
pub const STANZAS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";
