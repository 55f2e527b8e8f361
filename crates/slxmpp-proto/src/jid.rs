//! XMPP addresses (JIDs).
//!
//! A JID has the form `node@domain/resource` where only the domain is
//! mandatory. The "bare" form drops the resource and identifies an account;
//! the resource identifies one connected client of that account.
//!
//! # Reference
//! - RFC 7622: Extensible Messaging and Presence Protocol (XMPP): Address Format

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::JidError;

/// Maximum length in bytes of each JID part.
pub const MAX_PART_LEN: usize = 1023;

/// Characters never allowed in the node part.
const NODE_PROHIBITED: &[char] = &['"', '&', '\'', '/', ':', '<', '>', '@'];

/// A normalized XMPP address.
///
/// Node and domain are stored lowercased so that equality and hashing
/// compare normalized forms. The resource is case-sensitive and kept as-is.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Jid {
    node: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Parse and normalize a JID string.
    ///
    /// # Example
    ///
    /// ```
    /// use slxmpp_proto::Jid;
    ///
    /// let jid = Jid::parse("Alice@Wonderland.LIT/Tea").unwrap();
    /// assert_eq!(jid.to_string(), "alice@wonderland.lit/Tea");
    /// assert_eq!(jid.bare().to_string(), "alice@wonderland.lit");
    /// ```
    pub fn parse(s: &str) -> Result<Self, JidError> {
        if s.is_empty() {
            return Err(JidError::Empty);
        }

        let (rest, resource) = match s.split_once('/') {
            Some((rest, resource)) => {
                if resource.is_empty() {
                    return Err(JidError::EmptyResource);
                }
                (rest, Some(resource))
            }
            None => (s, None),
        };

        let (node, domain) = match rest.split_once('@') {
            Some((node, domain)) => {
                if node.is_empty() {
                    return Err(JidError::EmptyNode);
                }
                (Some(node), domain)
            }
            None => (None, rest),
        };

        let domain = domain.strip_suffix('.').unwrap_or(domain);
        if domain.is_empty() {
            return Err(JidError::EmptyDomain);
        }

        if let Some(node) = node {
            check_len(node)?;
            if let Some(c) = node
                .chars()
                .find(|c| NODE_PROHIBITED.contains(c) || c.is_whitespace() || c.is_control())
            {
                return Err(JidError::InvalidNodeChar(c));
            }
        }

        check_len(domain)?;
        if let Some(c) = domain
            .chars()
            .find(|c| *c == '@' || c.is_whitespace() || c.is_control())
        {
            return Err(JidError::InvalidDomainChar(c));
        }

        if let Some(resource) = resource {
            check_len(resource)?;
            if let Some(c) = resource.chars().find(|c| c.is_control()) {
                return Err(JidError::InvalidResourceChar(c));
            }
        }

        Ok(Self {
            node: node.map(str::to_lowercase),
            domain: domain.to_lowercase(),
            resource: resource.map(str::to_owned),
        })
    }

    /// The node (local part), if any.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// The domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The resource part, if any.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns `true` if this JID carries no resource.
    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }

    /// Returns this JID without its resource.
    pub fn bare(&self) -> Jid {
        Self {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// Returns a full JID with the given resource attached.
    pub fn with_resource(&self, resource: &str) -> Result<Jid, JidError> {
        Self::parse(&format!("{}/{}", self.bare(), resource))
    }

    /// Compare bare forms, ignoring resources.
    pub fn bare_eq(&self, other: &Jid) -> bool {
        self.node == other.node && self.domain == other.domain
    }
}

fn check_len(part: &str) -> Result<(), JidError> {
    if part.len() > MAX_PART_LEN {
        return Err(JidError::TooLong {
            actual: part.len(),
            limit: MAX_PART_LEN,
        });
    }
    Ok(())
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "{node}@")?;
        }
        f.write_str(&self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{resource}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Jid({self})")
    }
}

impl Ord for Jid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Jid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Jid {
    type Err = JidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Jid {
    type Error = JidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}
