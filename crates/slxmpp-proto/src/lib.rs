//! # slxmpp-proto
//!
//! Protocol types for the slxmppd XMPP server: addresses, immutable element
//! values, stanza envelopes, stanza errors and roster items.
//!
//! Raw XML parsing belongs to the transport; this crate works on element
//! trees that have already been parsed.
//!
//! ## Quick Start
//!
//! ```rust
//! use slxmpp_proto::{Jid, roster::{ItemSubscription, RosterItem}};
//!
//! let contact = Jid::parse("hatter@wonderland.lit").unwrap();
//! let item = RosterItem::new(contact, ItemSubscription::Both);
//! assert_eq!(
//!     item.to_element().to_string(),
//!     r#"<item jid="hatter@wonderland.lit" subscription="both"/>"#
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod condition;
pub mod element;
pub mod error;
pub mod jid;
pub mod ns;
pub mod roster;
pub mod stanza;

pub use self::condition::{Condition, ErrorType, StanzaError};
pub use self::element::Element;
pub use self::error::{ItemError, JidError, ProtocolError};
pub use self::jid::Jid;
pub use self::roster::{Ask, ItemSubscription, RosterItem};
pub use self::stanza::{presence, Iq, IqType, PresenceType, StanzaKind};
