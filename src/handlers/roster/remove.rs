//! Roster item removal.
//!
//! Removing a contact also severs the relationship from the contact's side
//! when the contact is a local account, and tells the contact through
//! presence notices.

use slxmpp_proto::{Iq, Jid, RosterItem};
use tracing::{error, info};

use super::{notify, push};
use crate::handlers::{Context, HandlerError, HandlerResult};

pub(super) async fn remove_item(ctx: &Context<'_>, iq: &Iq, jid: Jid) -> HandlerResult {
    let owner = ctx.bare_jid();
    let local = ctx.matrix.is_local(&jid);
    let reciprocal_owner = local && jid != owner;

    let lock_set = if reciprocal_owner {
        vec![owner.clone(), jid.clone()]
    } else {
        vec![owner.clone()]
    };
    let _guards = ctx.matrix.locks.lock_all(&lock_set).await;

    let mut user = ctx.load_user().await?;
    let Some(removed) = user.remove_follower(&jid) else {
        return Err(HandlerError::ItemNotFound);
    };

    let mut contact = if reciprocal_owner {
        ctx.matrix.storage.find_user(&jid).await?
    } else {
        None
    };
    let reciprocal = contact
        .as_mut()
        .and_then(|c| c.follower_mut(&owner))
        .map(|f| {
            f.sever();
            f.to_roster_item()
        });
    // Only a contact whose roster changed is written back.
    let contact = contact.filter(|_| reciprocal.is_some());

    ctx.matrix.storage.save_user(&user).await?;
    ctx.matrix.sessions.update_user_streams(&user);

    if let Some(contact) = &contact {
        if let Err(e) = ctx.matrix.storage.save_user(contact).await {
            crate::metrics::record_partial_removal();
            error!(
                user = %owner,
                contact = %jid,
                error = %e,
                "Roster removal saved for user but not for contact, rosters diverged"
            );
            return Err(e.into());
        }
        ctx.matrix.sessions.update_user_streams(contact);
    }

    ctx.reply(iq.result());
    push::push_roster_item(ctx.matrix, &owner, &RosterItem::removal(jid.clone()));

    if local && removed.is_subscribed_from() {
        notify::send_unavailable(ctx, &jid).await;
    }
    notify::send_unsubscribe(ctx, &removed).await;
    if let Some(item) = &reciprocal {
        push::push_roster_item(ctx.matrix, &jid, item);
    }

    info!(
        user = %owner,
        contact = %jid,
        subscription = %removed.subscription(),
        local,
        "Roster item removed"
    );
    Ok(())
}
