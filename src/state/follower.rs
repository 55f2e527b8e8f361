//! Roster contacts and their presence-subscription state machine.
//!
//! A [`Follower`] is one entry on a user's roster. Its subscription moves
//! between `none`, `to`, `from` and `both` only through the transition
//! methods below; there is no setter for an arbitrary state.
//!
//! # Reference
//! - RFC 6121 §3: Managing Presence Subscriptions

use serde::{Deserialize, Serialize};
use slxmpp_proto::{Ask, ItemSubscription, Jid, RosterItem};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Presence-subscription state of a contact, seen from the roster owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    /// No presence flows in either direction.
    #[default]
    None,
    /// The owner receives the contact's presence.
    To,
    /// The contact receives the owner's presence.
    From,
    /// Presence flows both ways.
    Both,
}

impl Subscription {
    /// Wire value of this state.
    pub fn as_str(self) -> &'static str {
        self.to_item().as_str()
    }

    /// The roster item attribute for this state.
    pub fn to_item(self) -> ItemSubscription {
        match self {
            Self::None => ItemSubscription::None,
            Self::To => ItemSubscription::To,
            Self::From => ItemSubscription::From,
            Self::Both => ItemSubscription::Both,
        }
    }

    /// States from which an outbound request may still be pending.
    fn allows_ask(self) -> bool {
        matches!(self, Self::None | Self::From)
    }
}

impl TryFrom<ItemSubscription> for Subscription {
    type Error = ItemSubscription;

    /// Fails for the `remove` marker, which is never a stored state.
    fn try_from(value: ItemSubscription) -> Result<Self, Self::Error> {
        match value {
            ItemSubscription::None => Ok(Self::None),
            ItemSubscription::To => Ok(Self::To),
            ItemSubscription::From => Ok(Self::From),
            ItemSubscription::Both => Ok(Self::Both),
            ItemSubscription::Remove => Err(value),
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted form of a contact, keyed externally by its address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<Ask>,
    /// Sorted, without duplicates.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A contact on a user's roster.
///
/// Equality, ordering and hashing use the bare address only.
#[derive(Clone, Debug)]
pub struct Follower {
    jid: Jid,
    name: Option<String>,
    subscription: Subscription,
    ask: Option<Ask>,
    groups: BTreeSet<String>,
}

impl Follower {
    /// A new contact with no subscription and no pending request.
    ///
    /// Any resource on `jid` is dropped.
    pub fn new(jid: &Jid) -> Self {
        Self {
            jid: jid.bare(),
            name: None,
            subscription: Subscription::None,
            ask: None,
            groups: BTreeSet::new(),
        }
    }

    /// Rebuild a contact from its persisted form.
    ///
    /// A pending `ask` is only kept for states that allow one.
    pub fn from_record(jid: &Jid, record: FollowerRecord) -> Self {
        let mut follower = Self::new(jid);
        follower.set_name(record.name);
        follower.set_groups(record.groups);
        follower.subscription = record.subscription;
        follower.ask = record.ask.filter(|_| record.subscription.allows_ask());
        follower
    }

    pub fn jid(&self) -> &Jid {
        &self.jid
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    pub fn ask(&self) -> Option<Ask> {
        self.ask
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Replace the display name; an empty name clears it.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.is_empty());
    }

    /// Replace the group set. Empty labels are skipped, duplicates collapse.
    pub fn set_groups<I: IntoIterator<Item = String>>(&mut self, groups: I) {
        self.groups = groups.into_iter().filter(|g| !g.is_empty()).collect();
    }

    /// Mark an outbound subscription request as pending.
    ///
    /// Only legal from `none` or `from`; returns whether `ask` was set.
    pub fn request_subscription(&mut self) -> bool {
        if self.subscription.allows_ask() {
            self.ask = Some(Ask::Subscribe);
            true
        } else {
            false
        }
    }

    /// The contact approved the owner's request.
    pub fn subscribe_to(&mut self) {
        self.subscription = match self.subscription {
            Subscription::None => Subscription::To,
            _ => Subscription::Both,
        };
        self.ask = None;
    }

    /// The owner no longer receives the contact's presence.
    pub fn unsubscribe_to(&mut self) {
        self.subscription = match self.subscription {
            Subscription::Both => Subscription::From,
            _ => Subscription::None,
        };
    }

    /// The owner approved the contact's request.
    pub fn subscribe_from(&mut self) {
        self.subscription = match self.subscription {
            Subscription::None => Subscription::From,
            _ => Subscription::Both,
        };
        self.ask = None;
    }

    /// The contact no longer receives the owner's presence.
    pub fn unsubscribe_from(&mut self) {
        self.subscription = match self.subscription {
            Subscription::Both => Subscription::To,
            _ => Subscription::None,
        };
    }

    /// Drop every presence relationship, including a pending request.
    ///
    /// Applied to the reciprocal entry when the other side deletes the contact.
    pub fn sever(&mut self) {
        self.subscription = Subscription::None;
        self.ask = None;
    }

    /// `true` when a request is pending and approving it is still meaningful.
    pub fn can_subscribe(&self) -> bool {
        self.ask == Some(Ask::Subscribe) && self.subscription.allows_ask()
    }

    /// The owner receives this contact's presence.
    pub fn is_subscribed_to(&self) -> bool {
        matches!(self.subscription, Subscription::To | Subscription::Both)
    }

    /// This contact receives the owner's presence.
    pub fn is_subscribed_from(&self) -> bool {
        matches!(self.subscription, Subscription::From | Subscription::Both)
    }

    /// Copy name, state and groups from another entry.
    pub fn update_from(&mut self, other: &Follower) {
        self.name = other.name.clone();
        self.subscription = other.subscription;
        self.ask = other.ask;
        self.groups = other.groups.clone();
    }

    pub fn to_record(&self) -> FollowerRecord {
        FollowerRecord {
            name: self.name.clone(),
            subscription: self.subscription,
            ask: self.ask,
            groups: self.groups.iter().cloned().collect(),
        }
    }

    pub fn to_roster_item(&self) -> RosterItem {
        RosterItem {
            jid: self.jid.clone(),
            name: self.name.clone(),
            subscription: self.subscription.to_item(),
            ask: self.ask,
            groups: self.groups.clone(),
        }
    }
}

impl TryFrom<RosterItem> for Follower {
    type Error = ItemSubscription;

    fn try_from(item: RosterItem) -> Result<Self, Self::Error> {
        let subscription = Subscription::try_from(item.subscription)?;
        Ok(Self::from_record(
            &item.jid,
            FollowerRecord {
                name: item.name,
                subscription,
                ask: item.ask,
                groups: item.groups.into_iter().collect(),
            },
        ))
    }
}

impl PartialEq for Follower {
    fn eq(&self, other: &Self) -> bool {
        self.jid == other.jid
    }
}

impl Eq for Follower {}

impl Hash for Follower {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.jid.hash(state);
    }
}

impl Ord for Follower {
    fn cmp(&self, other: &Self) -> Ordering {
        self.jid.cmp(&other.jid)
    }
}

impl PartialOrd for Follower {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
