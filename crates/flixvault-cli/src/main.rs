use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, lists, stats, Session};
use std::path::PathBuf;
use watchlist_config::{Config, PathManager};
use watchlist_core::WatchlistError;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "flixvault")]
#[command(about = "FlixVault - Your movie lists and what they say about you")]
#[command(version)]
struct Cli {
    /// Identity whose lists are used (falls back to FLIXVAULT_USER)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create empty lists for the identity (no-op when they exist)
    Register,
    /// Show all lists, or a single one
    List {
        /// watched, watching, planned, onhold or dropped
        category: Option<String>,
    },
    /// Add a movie to a list, moving it out of any other list
    #[command(long_about = "Add a movie payload to the head of a list. The payload is a JSON object as returned by a movie lookup; field names such as imdbId/imdbID, title, poster/poster_path, release_date/year, vote_average/rating, runtime and plot/overview are recognised. If the movie is already in another list it is moved.")]
    Add {
        /// watched, watching, planned, onhold or dropped
        category: String,

        /// Payload as an inline JSON string
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,

        /// Payload read from a JSON file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Remove a movie from one list, or from every list with "all"
    Remove {
        /// A category name or "all"
        target: String,

        /// IMDb id of the movie
        imdb_id: String,
    },
    /// Show which list a movie is in
    Status {
        /// IMDb id of the movie
        imdb_id: String,
    },
    /// Statistics computed from the identity's lists
    Stats,
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Delete stored lists
    Clear {
        /// Delete the lists of the selected identity
        #[arg(long, action = ArgAction::SetTrue)]
        user_data: bool,

        /// Delete the lists of every identity
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "user_data")]
        all: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration and paths
    Show,
    /// Write a default config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let user = cli.user.or_else(|| std::env::var("FLIXVAULT_USER").ok());

    let result = dispatch(cli.command, &config, &paths, user, &output).await;

    // Classified core failures get a stable kind; anything else goes to color-eyre
    if let Err(report) = result {
        if let Some(err) = report.downcast_ref::<WatchlistError>() {
            output.failure(err.kind(), err.to_string());
            std::process::exit(if err.is_client_error() { 2 } else { 1 });
        }
        return Err(report);
    }
    Ok(())
}

async fn dispatch(
    command: Commands,
    config: &Config,
    paths: &PathManager,
    user: Option<String>,
    output: &output::Output,
) -> color_eyre::Result<()> {
    match command {
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config::show_config(config, paths, output),
            ConfigCommands::Init { force } => config::init_config(paths, force, output),
        },
        Commands::Clear { user_data, all } => clear::run_clear(config, paths, user, user_data, all, output).await,
        Commands::Register => lists::run_register(&Session::open(config, paths, user).await?, output).await,
        Commands::List { category } => lists::run_list(&Session::open(config, paths, user).await?, category, output).await,
        Commands::Add { category, json, file } => {
            let session = Session::open(config, paths, user).await?;
            lists::run_add(&session, &category, json, file, output).await
        }
        Commands::Remove { target, imdb_id } => {
            let session = Session::open(config, paths, user).await?;
            lists::run_remove(&session, &target, &imdb_id, output).await
        }
        Commands::Status { imdb_id } => lists::run_status(&Session::open(config, paths, user).await?, &imdb_id, output).await,
        Commands::Stats => stats::run_stats(&Session::open(config, paths, user).await?, output).await,
    }
}
