//! Presence notices sent when a contact is removed.

use slxmpp_proto::{Element, Jid, PresenceType, presence};
use uuid::Uuid;

use crate::handlers::Context;
use crate::state::{Follower, Matrix};

/// Tell `follower` which subscription directions the requester dropped.
///
/// `unsubscribe` for a subscription to the contact, `unsubscribed` for a
/// subscription from it. Sent from the requester's bare address.
pub(super) async fn send_unsubscribe(ctx: &Context<'_>, follower: &Follower) {
    let from = ctx.bare_jid();
    let notices: Vec<Element> = [
        (follower.is_subscribed_to(), PresenceType::Unsubscribe),
        (follower.is_subscribed_from(), PresenceType::Unsubscribed),
    ]
    .into_iter()
    .filter(|(held, _)| *held)
    .map(|(_, kind)| presence(&from, follower.jid(), kind, &new_id()))
    .collect();

    deliver(ctx.matrix, follower.jid(), notices).await;
}

/// Send unavailable presence from each of the requester's resources.
///
/// Every bound session counts, whether or not it has sent initial presence;
/// available-presence tracking lives outside the roster core.
pub(super) async fn send_unavailable(ctx: &Context<'_>, to: &Jid) {
    let notices: Vec<Element> = ctx
        .matrix
        .sessions
        .connected_resources(ctx.jid())
        .iter()
        .map(|s| presence(s.jid(), to, PresenceType::Unavailable, &new_id()))
        .collect();

    deliver(ctx.matrix, to, notices).await;
}

/// Local recipients get the stanzas on every interested session; remote
/// ones go through the router.
async fn deliver(matrix: &Matrix, to: &Jid, stanzas: Vec<Element>) {
    if stanzas.is_empty() {
        return;
    }
    if matrix.is_local(to) {
        for session in matrix.sessions.interested_resources(to) {
            for stanza in &stanzas {
                session.write(stanza.clone());
            }
        }
    } else {
        for stanza in stanzas {
            matrix.router.route(stanza).await;
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
