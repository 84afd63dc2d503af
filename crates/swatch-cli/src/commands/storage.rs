use serde::Serialize;
use serde_json::json;
use swatch_core::entities::{Marker, SimpleStorage};
use swatch_db::updates::storage::StorageUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StorageCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StorageDetailResponse {
    storage: SimpleStorage,
    markers: Vec<Marker>,
}

/// Handle `swt storage`.
pub async fn handle(action: &StorageCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        StorageCommands::Create { name, description } => {
            let storage = ctx
                .service
                .create_storage(actor, name, description.as_deref())
                .await?;
            output(&storage, flags.format)
        }
        StorageCommands::List => {
            let storages = ctx.service.list_storages(actor, ctx.limit(None, flags)).await?;
            output(&storages, flags.format)
        }
        StorageCommands::Show { storage } => {
            let storage = ctx.service.find_storage(actor, storage).await?;
            let markers = ctx.service.storage_contents(actor, &storage.id).await?;
            output(&StorageDetailResponse { storage, markers }, flags.format)
        }
        StorageCommands::Update {
            storage,
            name,
            description,
            clear_description,
        } => {
            let storage = ctx.service.find_storage(actor, storage).await?;
            let mut builder = StorageUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(description) = description {
                builder = builder.description(Some(description.clone()));
            } else if *clear_description {
                builder = builder.description(None);
            }
            let updated = ctx
                .service
                .update_storage(actor, &storage.id, builder.build())
                .await?;
            output(&updated, flags.format)
        }
        StorageCommands::Delete { storage } => {
            let storage = ctx.service.find_storage(actor, storage).await?;
            ctx.service.delete_storage(actor, &storage.id).await?;
            output(&json!({ "deleted": storage.id, "name": storage.name }), flags.format)
        }
    }
}
