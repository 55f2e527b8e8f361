//! Roster item wire representation.
//!
//! # Reference
//! - RFC 6121 §2.1: Roster Syntax and Semantics

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{ItemError, JidError};
use crate::jid::Jid;
use crate::ns;
use crate::stanza::IqType;

/// The `subscription` attribute of a roster item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ItemSubscription {
    /// No subscription in either direction.
    None,
    /// The owner receives the contact's presence.
    To,
    /// The contact receives the owner's presence.
    From,
    /// Both directions.
    Both,
    /// Marker for a deleted item; never a stored state.
    Remove,
}

impl ItemSubscription {
    /// Wire value of this state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::To => "to",
            Self::From => "from",
            Self::Both => "both",
            Self::Remove => "remove",
        }
    }
}

impl FromStr for ItemSubscription {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "to" => Ok(Self::To),
            "from" => Ok(Self::From),
            "both" => Ok(Self::Both),
            "remove" => Ok(Self::Remove),
            other => Err(ItemError::UnknownSubscription(other.to_owned())),
        }
    }
}

impl fmt::Display for ItemSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `ask` attribute of a roster item: a pending outbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Ask {
    /// Subscription request sent, approval pending.
    Subscribe,
}

impl Ask {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
        }
    }
}

/// A single `<item/>` of a roster query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterItem {
    /// Contact address, always bare.
    pub jid: Jid,
    /// Display name.
    pub name: Option<String>,
    /// Subscription state or removal marker.
    pub subscription: ItemSubscription,
    /// Pending outbound request.
    pub ask: Option<Ask>,
    /// Group labels.
    pub groups: BTreeSet<String>,
}

impl RosterItem {
    /// An item with no name, no groups and no pending request.
    pub fn new(jid: Jid, subscription: ItemSubscription) -> Self {
        Self {
            jid,
            name: None,
            subscription,
            ask: None,
            groups: BTreeSet::new(),
        }
    }

    /// The removal marker pushed when a contact is deleted.
    pub fn removal(jid: Jid) -> Self {
        Self::new(jid, ItemSubscription::Remove)
    }

    /// Render as an `<item/>` element.
    ///
    /// `ask` and an empty `name` are omitted; groups come out sorted.
    pub fn to_element(&self) -> Element {
        Element::new("item")
            .with_opt_attr("ask", self.ask.map(Ask::as_str))
            .with_attr("jid", self.jid.bare().to_string())
            .with_opt_attr("name", self.name.as_deref().filter(|n| !n.is_empty()))
            .with_attr("subscription", self.subscription.as_str())
            .with_children(
                self.groups
                    .iter()
                    .map(|g| Element::new("group").with_text(g.as_str())),
            )
    }

    /// Parse a full item, checking every field.
    pub fn from_element(item: &Element) -> Result<Self, ItemError> {
        let jid = parse_jid(item)?;
        let subscription = item
            .attr("subscription")
            .map(str::parse::<ItemSubscription>)
            .transpose()?
            .unwrap_or(ItemSubscription::None);
        let ask = match item.attr("ask") {
            Some("subscribe") => Some(Ask::Subscribe),
            _ => None,
        };
        let groups = parse_groups(item)?;

        Ok(Self {
            jid,
            name: parse_name(item),
            subscription,
            ask,
            groups: groups.into_iter().collect(),
        })
    }
}

/// Parse the item address.
///
/// A missing or empty address is [`ItemError::EmptyJid`], a resource part
/// is [`ItemError::NotBare`], and any other syntax error is
/// [`ItemError::MalformedJid`].
pub fn parse_jid(item: &Element) -> Result<Jid, ItemError> {
    let raw = item.attr("jid").unwrap_or_default();
    let jid = Jid::parse(raw).map_err(|e| match e {
        JidError::Empty => ItemError::EmptyJid,
        other => ItemError::MalformedJid(other),
    })?;
    if !jid.is_bare() {
        return Err(ItemError::NotBare(jid.to_string()));
    }
    Ok(jid)
}

/// Parse the display name; an empty value counts as absent.
pub fn parse_name(item: &Element) -> Option<String> {
    item.attr("name")
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
}

/// Parse the `<group/>` children of an item.
///
/// Labels are trimmed. Duplicates are rejected before empty labels, so two
/// blank groups report [`ItemError::DuplicateGroup`].
pub fn parse_groups(item: &Element) -> Result<Vec<String>, ItemError> {
    let groups: Vec<String> = item
        .children_ns("group", ns::ROSTER)
        .map(|g| g.text().trim().to_owned())
        .collect();

    let mut seen = BTreeSet::new();
    for group in &groups {
        if !seen.insert(group.as_str()) {
            return Err(ItemError::DuplicateGroup(group.clone()));
        }
    }

    if groups.iter().any(String::is_empty) {
        return Err(ItemError::EmptyGroup);
    }

    Ok(groups)
}

/// Build a `<query xmlns="jabber:iq:roster"/>` holding the given items.
pub fn query<I: IntoIterator<Item = Element>>(items: I) -> Element {
    Element::with_ns("query", ns::ROSTER).with_children(items)
}

/// Build a roster push: an IQ set carrying a single item.
pub fn push(id: &str, to: &Jid, item: &RosterItem) -> Element {
    Element::new("iq")
        .with_attr("id", id)
        .with_attr("to", to.to_string())
        .with_attr("type", IqType::Set.as_str())
        .with_child(query([item.to_element()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jid(s: &str) -> Jid {
        Jid::parse(s).unwrap()
    }

    fn item_el(jid: &str) -> Element {
        Element::new("item").with_attr("jid", jid)
    }

    #[test]
    fn test_to_element_omits_empty() {
        let item = RosterItem::new(jid("hatter@wonderland.lit"), ItemSubscription::None);
        assert_eq!(
            item.to_element().to_string(),
            r#"<item jid="hatter@wonderland.lit" subscription="none"/>"#
        );
    }

    #[test]
    fn test_to_element_full() {
        let mut item = RosterItem::new(jid("hatter@wonderland.lit"), ItemSubscription::From);
        item.ask = Some(Ask::Subscribe);
        item.name = Some("Hatter".into());
        item.groups = ["Tea", "Friends"].into_iter().map(String::from).collect();
        assert_eq!(
            item.to_element().to_string(),
            concat!(
                r#"<item ask="subscribe" jid="hatter@wonderland.lit" name="Hatter" subscription="from">"#,
                r#"<group>Friends</group><group>Tea</group></item>"#
            )
        );
    }

    #[test]
    fn test_parse_jid_errors() {
        assert_eq!(parse_jid(&Element::new("item")), Err(ItemError::EmptyJid));
        assert_eq!(parse_jid(&item_el("")), Err(ItemError::EmptyJid));
        assert!(matches!(
            parse_jid(&item_el("@wonderland.lit")),
            Err(ItemError::MalformedJid(_))
        ));
        assert!(matches!(
            parse_jid(&item_el("hatter@wonderland.lit/hat")),
            Err(ItemError::NotBare(_))
        ));
        assert_eq!(
            parse_jid(&item_el("Hatter@Wonderland.lit")),
            Ok(jid("hatter@wonderland.lit"))
        );
    }

    #[test]
    fn test_parse_groups() {
        let el = item_el("hatter@wonderland.lit")
            .with_child(Element::new("group").with_text("  Tea "))
            .with_child(Element::new("group").with_text("Friends"));
        assert_eq!(parse_groups(&el), Ok(vec!["Tea".into(), "Friends".into()]));

        let dup = item_el("hatter@wonderland.lit")
            .with_child(Element::new("group").with_text("Tea"))
            .with_child(Element::new("group").with_text(" Tea"));
        assert_eq!(parse_groups(&dup), Err(ItemError::DuplicateGroup("Tea".into())));

        let empty = item_el("hatter@wonderland.lit")
            .with_child(Element::new("group").with_text("  "));
        assert_eq!(parse_groups(&empty), Err(ItemError::EmptyGroup));

        let two_empty = item_el("hatter@wonderland.lit")
            .with_child(Element::new("group"))
            .with_child(Element::new("group").with_text(" "));
        assert_eq!(
            parse_groups(&two_empty),
            Err(ItemError::DuplicateGroup(String::new()))
        );
    }

    #[test]
    fn test_from_element_reads_back_rendered_item() {
        let mut item = RosterItem::new(jid("hatter@wonderland.lit"), ItemSubscription::Both);
        item.name = Some("Hatter".into());
        item.groups.insert("Tea".into());
        assert_eq!(RosterItem::from_element(&item.to_element()), Ok(item));
    }

    #[test]
    fn test_unknown_subscription() {
        let el = item_el("hatter@wonderland.lit").with_attr("subscription", "sideways");
        assert_eq!(
            RosterItem::from_element(&el),
            Err(ItemError::UnknownSubscription("sideways".into()))
        );
    }

    #[test]
    fn test_push() {
        let item = RosterItem::removal(jid("hatter@wonderland.lit"));
        let el = push("p1", &jid("alice@wonderland.lit/tea"), &item);
        assert_eq!(
            el.to_string(),
            concat!(
                r#"<iq id="p1" to="alice@wonderland.lit/tea" type="set">"#,
                r#"<query xmlns="jabber:iq:roster">"#,
                r#"<item jid="hatter@wonderland.lit" subscription="remove"/>"#,
                r#"</query></iq>"#
            )
        );
    }
}
