pub mod clear;
pub mod config;
pub mod lists;
pub mod stats;

use color_eyre::Result;
use comfy_table::{Cell, Table};
use tracing::warn;
use watchlist_config::{Config, PathManager, StorageBackend};
use watchlist_core::WatchlistService;
use watchlist_models::Identity;

/// An opened service plus the identity the command acts for
pub struct Session {
    pub service: WatchlistService,
    pub identity: Identity,
}

impl Session {
    pub async fn open(config: &Config, paths: &PathManager, user: Option<String>) -> Result<Self> {
        let identity = require_identity(user)?;
        let service = WatchlistService::from_config(config, paths)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open watchlist storage: {}", e))?;

        // Nothing survives between invocations, so every run starts registered
        if config.storage.backend == StorageBackend::Memory {
            warn!("Memory backend selected: lists are discarded when the command exits");
            service.register(&identity).await?;
        }

        Ok(Self { service, identity })
    }
}

pub fn require_identity(user: Option<String>) -> Result<Identity> {
    match user.map(|u| u.trim().to_string()) {
        Some(user) if !user.is_empty() => Ok(Identity::new(user)),
        _ => Err(color_eyre::eyre::eyre!(
            "No identity given. Use --user <name> or set FLIXVAULT_USER"
        )),
    }
}

/// Rounded UTF-8 table with a bold cyan title row
pub fn titled_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold)
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}
