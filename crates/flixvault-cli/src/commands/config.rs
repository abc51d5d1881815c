use super::titled_table;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;
use watchlist_config::{Config, PathManager, StorageBackend};

pub fn show_config(config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let lists_dir = lists_dir(config, paths);

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "lists_dir": lists_dir.as_ref().map(|dir| dir.display().to_string()),
            "config": config,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {} (using defaults)", config_file.display()));
        output.info("Run 'flixvault config init' to create one.");
        println!();
    }

    let mut storage_table = titled_table("Storage");
    storage_table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    storage_table.add_row(vec![Cell::new("Backend"), Cell::new(format!("{:?}", config.storage.backend).to_lowercase())]);
    match &lists_dir {
        Some(dir) => {
            storage_table.add_row(vec![Cell::new("Format"), Cell::new(format!("{:?}", config.storage.format).to_lowercase())]);
            storage_table.add_row(vec![Cell::new("Lists directory"), Cell::new(dir.display())]);
        }
        None => {
            storage_table.add_row(vec![Cell::new("Lists directory"), Cell::new("(in memory only)".yellow().to_string())]);
        }
    }
    println!("{}", storage_table);
    println!();

    let mut stats_table = titled_table("Statistics");
    stats_table.add_row(vec![Cell::new("Top years"), Cell::new(config.stats.top_years)]);
    println!("{}", stats_table);
    println!();

    let mut logging_table = titled_table("Logging");
    logging_table.add_row(vec![Cell::new("Level"), Cell::new(&config.logging.level)]);
    logging_table.add_row(vec![
        Cell::new("JSON"),
        Cell::new(if config.logging.json { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    logging_table.add_row(vec![
        Cell::new("File"),
        Cell::new(
            config
                .logging
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_else(|| "(stderr)".to_string()),
        ),
    ]);
    println!("{}", logging_table);
    Ok(())
}

pub fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("Configuration already exists at: {}", config_file.display()));
        output.info("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;

    let mut config = Config::default();
    config.logging.json = false;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}

/// `None` for the memory backend
pub fn lists_dir(config: &Config, paths: &PathManager) -> Option<PathBuf> {
    match config.storage.backend {
        StorageBackend::File => Some(config.storage.data_dir.clone().unwrap_or_else(|| paths.lists_dir())),
        StorageBackend::Memory => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        init_config(&paths, false, &output).unwrap();
        let loaded = Config::load_or_default(&paths.config_file()).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::File);
        assert!(!loaded.logging.json);
        assert!(paths.lists_dir().is_dir());
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);
        std::fs::write(paths.config_file(), "[stats]\ntop_years = 3\n").unwrap();

        init_config(&paths, false, &output).unwrap();
        assert_eq!(Config::load_or_default(&paths.config_file()).unwrap().stats.top_years, 3);

        init_config(&paths, true, &output).unwrap();
        assert_eq!(Config::load_or_default(&paths.config_file()).unwrap().stats.top_years, 10);
    }

    #[test]
    fn test_lists_dir() {
        let paths = PathManager::with_base("/srv/flixvault");
        let mut config = Config::default();
        assert_eq!(lists_dir(&config, &paths), Some(PathBuf::from("/srv/flixvault/data/lists")));

        config.storage.data_dir = Some(PathBuf::from("/mnt/lists"));
        assert_eq!(lists_dir(&config, &paths), Some(PathBuf::from("/mnt/lists")));

        config.storage.backend = StorageBackend::Memory;
        assert_eq!(lists_dir(&config, &paths), None);
    }
}
