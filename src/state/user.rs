//! Accounts and their rosters.

use serde::{Deserialize, Serialize};
use slxmpp_proto::{Element, Jid, roster};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use super::follower::{Follower, FollowerRecord};

/// Persisted form of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub jid: Jid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub roster: BTreeMap<Jid, FollowerRecord>,
}

/// A local account and its roster.
///
/// The roster holds at most one [`Follower`] per bare address. Equality,
/// ordering and hashing use the account address only.
#[derive(Clone, Debug)]
pub struct User {
    jid: Jid,
    pub name: Option<String>,
    pub password: Option<String>,
    roster: BTreeMap<Jid, Follower>,
}

impl User {
    /// An account with an empty roster. Any resource on `jid` is dropped.
    pub fn new(jid: &Jid) -> Self {
        Self {
            jid: jid.bare(),
            name: None,
            password: None,
            roster: BTreeMap::new(),
        }
    }

    pub fn from_record(record: UserRecord) -> Self {
        let mut user = Self::new(&record.jid);
        user.name = record.name;
        user.password = record.password;
        for (jid, follower) in record.roster {
            user.add_follower(Follower::from_record(&jid, follower));
        }
        user
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            jid: self.jid.clone(),
            name: self.name.clone(),
            password: self.password.clone(),
            roster: self
                .roster
                .iter()
                .map(|(jid, f)| (jid.clone(), f.to_record()))
                .collect(),
        }
    }

    pub fn jid(&self) -> &Jid {
        &self.jid
    }

    /// Roster entries in address order.
    pub fn followers(&self) -> impl Iterator<Item = &Follower> {
        self.roster.values()
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Look up a contact; the resource of `jid` is ignored.
    pub fn follower(&self, jid: &Jid) -> Option<&Follower> {
        self.roster.get(&jid.bare())
    }

    pub fn follower_mut(&mut self, jid: &Jid) -> Option<&mut Follower> {
        self.roster.get_mut(&jid.bare())
    }

    pub fn is_follower(&self, jid: &Jid) -> bool {
        self.follower(jid).is_some()
    }

    /// The contact for `jid`, created with default state if missing.
    pub fn follower_entry(&mut self, jid: &Jid) -> &mut Follower {
        let bare = jid.bare();
        self.roster
            .entry(bare)
            .or_insert_with_key(Follower::new)
    }

    /// Insert a contact, replacing any entry with the same address.
    pub fn add_follower(&mut self, follower: Follower) -> Option<Follower> {
        self.roster.insert(follower.jid().clone(), follower)
    }

    pub fn remove_follower(&mut self, jid: &Jid) -> Option<Follower> {
        self.roster.remove(&jid.bare())
    }

    /// The owner receives the presence of `jid`.
    pub fn is_subscribed_to(&self, jid: &Jid) -> bool {
        self.follower(jid).is_some_and(Follower::is_subscribed_to)
    }

    /// `jid` receives the owner's presence.
    pub fn is_subscribed_from(&self, jid: &Jid) -> bool {
        self.follower(jid).is_some_and(Follower::is_subscribed_from)
    }

    /// Contacts whose presence the owner receives.
    pub fn subscribed_to(&self) -> impl Iterator<Item = &Follower> {
        self.followers().filter(|f| f.is_subscribed_to())
    }

    /// Contacts receiving the owner's presence.
    pub fn subscribed_from(&self) -> impl Iterator<Item = &Follower> {
        self.followers().filter(|f| f.is_subscribed_from())
    }

    /// Record an outbound request to `jid`, adding the contact if needed.
    pub fn request_subscription(&mut self, jid: &Jid) -> bool {
        self.follower_entry(jid).request_subscription()
    }

    /// Approve an inbound request from `jid`, adding the contact if needed.
    pub fn add_subscription_from(&mut self, jid: &Jid) {
        self.follower_entry(jid).subscribe_from();
    }

    pub fn remove_subscription_to(&mut self, jid: &Jid) {
        if let Some(follower) = self.follower_mut(jid) {
            follower.unsubscribe_to();
        }
    }

    pub fn remove_subscription_from(&mut self, jid: &Jid) {
        if let Some(follower) = self.follower_mut(jid) {
            follower.unsubscribe_from();
        }
    }

    /// Replace this account's fields and roster with another's.
    pub fn update_from(&mut self, other: &User) {
        self.name = other.name.clone();
        self.password = other.password.clone();
        self.roster.retain(|jid, _| other.roster.contains_key(jid));
        for (jid, follower) in &other.roster {
            match self.roster.get_mut(jid) {
                Some(existing) => existing.update_from(follower),
                None => {
                    self.roster.insert(jid.clone(), follower.clone());
                }
            }
        }
    }

    /// The roster `<query/>`: every entry in address order.
    pub fn roster_query(&self) -> Element {
        roster::query(self.followers().map(|f| f.to_roster_item().to_element()))
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.jid == other.jid
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.jid.hash(state);
    }
}

impl Ord for User {
    fn cmp(&self, other: &Self) -> Ordering {
        self.jid.cmp(&other.jid)
    }
}

impl PartialOrd for User {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
