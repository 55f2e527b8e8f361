//! Accounts created at startup.
//!
//! Lets an operator provision accounts and pre-established rosters without
//! a registration flow, for example two users who already share presence:
//!
//! ```toml
//! [[users]]
//! jid = "alice@wonderland.lit"
//! password = "alice"
//!
//! [[users.roster]]
//! jid = "arthur@wonderland.lit"
//! name = "Arthur"
//! subscription = "both"
//! groups = ["Buddies"]
//! ```

use serde::Deserialize;
use slxmpp_proto::{Ask, Jid, JidError};

use crate::state::{Follower, FollowerRecord, Subscription, User};

/// One seeded account.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub jid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roster: Vec<SeedContact>,
}

/// One roster entry of a seeded account.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedContact {
    pub jid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default)]
    pub ask: Option<Ask>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl SeedUser {
    /// Build the account this entry describes.
    pub fn to_user(&self) -> Result<User, JidError> {
        let mut user = User::new(&Jid::parse(&self.jid)?);
        user.name = self.name.clone();
        user.password = self.password.clone();
        for contact in &self.roster {
            user.add_follower(contact.to_follower()?);
        }
        Ok(user)
    }
}

impl SeedContact {
    pub fn to_follower(&self) -> Result<Follower, JidError> {
        let jid = Jid::parse(&self.jid)?;
        Ok(Follower::from_record(
            &jid,
            FollowerRecord {
                name: self.name.clone(),
                subscription: self.subscription,
                ask: self.ask,
                groups: self.groups.iter().map(|g| g.trim().to_owned()).collect(),
            },
        ))
    }
}
