//! Roster retrieval.

use slxmpp_proto::Iq;
use tracing::debug;

use crate::handlers::{Context, HandlerResult};

/// Answer a roster get and subscribe the session to later pushes.
pub(super) async fn roster_get(ctx: &Context<'_>, iq: &Iq) -> HandlerResult {
    let user = ctx.load_user().await?;
    ctx.session.mark_requested_roster();

    ctx.reply(iq.result().with_child(user.roster_query()));

    debug!(user = %user.jid(), contacts = user.roster_len(), "Roster sent");
    Ok(())
}
