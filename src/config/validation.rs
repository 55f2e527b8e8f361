//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use slxmpp_proto::{Jid, JidError};
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.domains must list at least one domain")]
    NoDomains,
    #[error("server.domains entry '{domain}' is not a valid domain: {source}")]
    InvalidDomain {
        domain: String,
        #[source]
        source: JidError,
    },
    #[error("server.domains entry '{0}' must be a bare domain")]
    DomainNotBare(String),
    #[error("limits.session_queue must be at least 1")]
    ZeroSessionQueue,
    #[error("users entry '{jid}' is not a valid address: {source}")]
    InvalidUserJid {
        jid: String,
        #[source]
        source: JidError,
    },
    #[error("users entry '{0}' must be a bare address with a node")]
    UserNotAccount(String),
    #[error("users entry '{0}' is not in a hosted domain")]
    UserNotLocal(String),
    #[error("users entry '{0}' appears more than once")]
    DuplicateUser(String),
    #[error("roster entry '{contact}' of '{user}' is not a valid address: {source}")]
    InvalidContactJid {
        user: String,
        contact: String,
        #[source]
        source: JidError,
    },
    #[error("roster entry '{contact}' of '{user}' must be a bare address")]
    ContactNotBare { user: String, contact: String },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.server.domains.is_empty() {
        errors.push(ValidationError::NoDomains);
    }

    let mut domains = HashSet::new();
    for domain in &config.server.domains {
        match Jid::parse(domain) {
            Ok(jid) if jid.node().is_none() && jid.is_bare() => {
                domains.insert(jid.domain().to_owned());
            }
            Ok(_) => errors.push(ValidationError::DomainNotBare(domain.clone())),
            Err(source) => errors.push(ValidationError::InvalidDomain {
                domain: domain.clone(),
                source,
            }),
        }
    }

    if config.limits.session_queue == 0 {
        errors.push(ValidationError::ZeroSessionQueue);
    }

    let mut seen = HashSet::new();
    for user in &config.users {
        match Jid::parse(&user.jid) {
            Ok(jid) if jid.node().is_none() || !jid.is_bare() => {
                errors.push(ValidationError::UserNotAccount(user.jid.clone()));
            }
            Ok(jid) => {
                if !domains.contains(jid.domain()) {
                    errors.push(ValidationError::UserNotLocal(user.jid.clone()));
                }
                if !seen.insert(jid) {
                    errors.push(ValidationError::DuplicateUser(user.jid.clone()));
                }
            }
            Err(source) => errors.push(ValidationError::InvalidUserJid {
                jid: user.jid.clone(),
                source,
            }),
        }

        for contact in &user.roster {
            match Jid::parse(&contact.jid) {
                Ok(jid) if jid.is_bare() => {}
                Ok(_) => errors.push(ValidationError::ContactNotBare {
                    user: user.jid.clone(),
                    contact: contact.jid.clone(),
                }),
                Err(source) => errors.push(ValidationError::InvalidContactJid {
                    user: user.jid.clone(),
                    contact: contact.jid.clone(),
                    source,
                }),
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
