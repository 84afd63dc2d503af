use std::path::PathBuf;

use anyhow::Context;
use swatch_config::{DatabaseConfig, SwatchConfig};
use swatch_core::identity::Actor;
use swatch_db::service::SwatchService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SwatchService,
    pub config: SwatchConfig,
    actor: Option<Actor>,
    /// Username asked for via `--user` or config, even if it did not resolve.
    requested_user: Option<String>,
}

impl AppContext {
    /// Open the database and resolve the acting user.
    ///
    /// An unknown username is not fatal here so `swt user create` can run
    /// against an empty database; commands that need an actor fail later.
    pub async fn init(config: SwatchConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = resolve_db_path(&config, flags.db.as_deref())?;
        let is_memory = db_path.as_os_str() == swatch_config::MEMORY;
        if !is_memory {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory '{}'", parent.display())
                })?;
            }
        }

        let service = SwatchService::new_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open database '{}'", db_path.display()))?;

        let requested_user = flags
            .user
            .clone()
            .or_else(|| config.general.has_user().then(|| config.general.user.clone()));

        let actor = match requested_user.as_deref() {
            Some(name) => {
                let user = service.find_user_by_name(name).await?;
                if user.is_none() {
                    tracing::debug!(user = name, "requested user does not exist yet");
                }
                user.as_ref().map(Actor::from)
            }
            None => None,
        };

        tracing::debug!(path = %db_path.display(), actor = ?actor, "application context ready");
        Ok(Self {
            service,
            config,
            actor,
            requested_user,
        })
    }

    /// The acting user, required by every inventory command.
    pub fn actor(&self) -> anyhow::Result<&Actor> {
        if let Some(actor) = &self.actor {
            return Ok(actor);
        }
        match &self.requested_user {
            Some(name) => anyhow::bail!("unknown user '{name}'; create it with `swt user create {name}`"),
            None => anyhow::bail!(
                "no acting user; pass --user or set general.user (SWATCH_GENERAL__USER)"
            ),
        }
    }

    pub const fn actor_opt(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Limit for list commands: local flag, then global flag, then config.
    pub fn limit(&self, local: Option<u32>, flags: &GlobalFlags) -> u32 {
        crate::commands::shared::limit::effective_limit(
            local,
            flags.limit,
            self.config.general.default_limit,
        )
    }
}

fn resolve_db_path(config: &SwatchConfig, flag: Option<&str>) -> anyhow::Result<PathBuf> {
    let path = match flag {
        Some(path) => DatabaseConfig {
            path: path.to_string(),
        }
        .resolve_path(),
        None => config.database.resolve_path(),
    };
    path.context("failed to resolve database path")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(user: Option<&str>, db: &str) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: true,
            verbose: false,
            user: user.map(String::from),
            db: Some(db.to_string()),
        }
    }

    #[tokio::test]
    async fn creates_database_directory_and_resolves_user() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("nested").join("swatch.db");
        let db = db.to_string_lossy();

        let ctx = AppContext::init(SwatchConfig::default(), &flags(Some("ada"), &db))
            .await
            .unwrap();
        let err = ctx.actor().unwrap_err();
        assert!(err.to_string().contains("unknown user 'ada'"), "{err}");
        ctx.service.create_user(None, "ada", false).await.unwrap();
        drop(ctx);

        let ctx = AppContext::init(SwatchConfig::default(), &flags(Some("ada"), &db))
            .await
            .unwrap();
        let actor = ctx.actor().unwrap();
        assert!(actor.is_admin);
        assert_eq!(ctx.limit(None, &flags(None, &db)), 20);
    }

    #[tokio::test]
    async fn memory_database_needs_no_directory() {
        let ctx = AppContext::init(SwatchConfig::default(), &flags(None, ":memory:"))
            .await
            .unwrap();
        assert!(ctx.actor_opt().is_none());
        assert!(ctx.actor().unwrap_err().to_string().contains("--user"));
    }
}
