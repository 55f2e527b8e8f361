//! Roster item add/update.

use slxmpp_proto::{Element, ItemSubscription, Iq, ns, roster};
use tracing::info;

use super::{push, remove};
use crate::handlers::{Context, HandlerError, HandlerResult};

/// Handle a roster set: add or update one item, or remove it.
///
/// Only the name and groups are written here. Subscription state changes
/// through presence subscriptions or removal.
pub(super) async fn roster_set(ctx: &Context<'_>, iq: &Iq) -> HandlerResult {
    let item = single_item(iq)?;
    let jid = roster::parse_jid(item)?;

    if item.attr("subscription") == Some(ItemSubscription::Remove.as_str()) {
        return remove::remove_item(ctx, iq, jid).await;
    }

    let owner = ctx.bare_jid();
    if jid == owner {
        return Err(HandlerError::NotAllowed);
    }

    let groups = roster::parse_groups(item)?;
    let name = roster::parse_name(item);

    // Held until the push has gone out.
    let _guard = ctx.matrix.locks.lock(&owner).await;

    let mut user = ctx.load_user().await?;
    let follower = user.follower_entry(&jid);
    follower.set_name(name);
    follower.set_groups(groups);
    let pushed = follower.to_roster_item();

    ctx.matrix.storage.save_user(&user).await?;
    ctx.matrix.sessions.update_user_streams(&user);

    ctx.reply(iq.result());
    push::push_roster_item(ctx.matrix, &owner, &pushed);

    info!(
        user = %owner,
        contact = %jid,
        groups = pushed.groups.len(),
        "Roster item updated"
    );
    Ok(())
}

/// The request must carry exactly one `<item/>`.
fn single_item(iq: &Iq) -> Result<&Element, HandlerError> {
    let query = iq
        .payload
        .as_ref()
        .ok_or_else(|| HandlerError::BadRequest("missing query".into()))?;
    let mut items = query.children_ns("item", ns::ROSTER);
    match (items.next(), items.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(HandlerError::BadRequest("no item".into())),
        (Some(_), Some(_)) => Err(HandlerError::BadRequest("more than one item".into())),
    }
}
