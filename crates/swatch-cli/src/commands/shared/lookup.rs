use swatch_core::entities::Marker;
use swatch_core::identity::Actor;
use swatch_core::ids::{PREFIX_MARKER, has_prefix};

use crate::context::AppContext;

/// Resolve a marker by ID, falling back to the actor's marker number.
pub async fn marker(ctx: &AppContext, actor: &Actor, reference: &str) -> anyhow::Result<Marker> {
    if has_prefix(reference, PREFIX_MARKER) {
        match ctx.service.get_marker(actor, reference).await {
            Ok(marker) => return Ok(marker),
            Err(error) if error.is_not_found() => {}
            Err(error) => return Err(error.into()),
        }
    }
    Ok(ctx.service.get_marker_by_number(actor, reference).await?)
}
