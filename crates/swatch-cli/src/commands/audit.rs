use swatch_core::enums::{AuditAction, EntityType};
use swatch_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `swt audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    // Reading the trail still requires a known user.
    ctx.actor()?;

    let actor_id = match args.actor.as_deref() {
        Some(username) => Some(
            ctx.service
                .find_user_by_name(username)
                .await?
                .ok_or_else(|| anyhow::anyhow!("unknown user '{username}'"))?
                .id,
        ),
        None => None,
    };

    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|value| parse_enum::<EntityType>(value, "entity-type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|value| parse_enum::<AuditAction>(value, "action"))
            .transpose()?,
        actor_id,
        limit: Some(ctx.limit(None, flags)),
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
