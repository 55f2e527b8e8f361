//! Roster push notifier.

use slxmpp_proto::{Jid, RosterItem, roster};
use tracing::debug;
use uuid::Uuid;

use crate::state::Matrix;

/// Push one changed item to every interested session of `owner`.
///
/// Each session gets its own stanza and id. Writes never wait, so a full or
/// closed session cannot hold up the rest. Returns how many were queued.
pub fn push_roster_item(matrix: &Matrix, owner: &Jid, item: &RosterItem) -> usize {
    let recipients = matrix.sessions.interested_resources(owner);

    let delivered = recipients
        .iter()
        .map(|session| {
            let id = Uuid::new_v4().to_string();
            session.write(roster::push(&id, session.jid(), item))
        })
        .filter(|&sent| sent)
        .count();

    crate::metrics::record_roster_push(recipients.len());
    debug!(
        owner = %owner,
        contact = %item.jid,
        subscription = %item.subscription,
        recipients = recipients.len(),
        delivered,
        "Roster push"
    );
    delivered
}
