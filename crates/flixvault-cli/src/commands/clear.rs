use super::config::lists_dir;
use super::Session;
use crate::output::Output;
use color_eyre::Result;
use watchlist_config::{Config, PathManager};
use watchlist_core::FileStorage;

pub async fn run_clear(
    config: &Config,
    paths: &PathManager,
    user: Option<String>,
    user_data: bool,
    all: bool,
    output: &Output,
) -> Result<()> {
    if all {
        return clear_all_lists(config, paths, output).await;
    }

    if user_data {
        let session = Session::open(config, paths, user).await?;
        if session.service.forget(&session.identity).await? {
            output.success(format!("Cleared lists for {}", session.identity));
        } else {
            output.info(format!("No lists stored for {}", session.identity));
        }
        return Ok(());
    }

    output.warn("No clear option specified. Use --user-data or --all");
    output.println("\nExample: flixvault --user alice clear --user-data");
    Ok(())
}

/// Delete every stored account record, leaving any other files in the directory
async fn clear_all_lists(config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let Some(lists_dir) = lists_dir(config, paths) else {
        output.info("Memory backend: nothing is stored on disk");
        return Ok(());
    };

    if !lists_dir.exists() {
        output.info("No stored lists found to clear");
        return Ok(());
    }

    let storage = FileStorage::new(&lists_dir, config.storage.format)?;
    let deleted = storage
        .delete_all()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear lists in {}: {}", lists_dir.display(), e))?;

    if deleted == 0 {
        output.info(format!("No stored lists found in {}", lists_dir.display()));
    } else {
        output.success(format!("Cleared {} stored list(s) in {}", deleted, lists_dir.display()));
    }
    Ok(())
}
