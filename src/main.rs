use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use goaltrack::cli::{self, Cli, Commands};
use goaltrack::{AppStore, Config, Profile, Storage};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Logs go to stderr so they don't interfere with command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Open storage and rehydrate the application store
    let db_path = config.get_database_path();
    let storage = Storage::open(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    let mut store = AppStore::open(storage);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Add {
            title,
            due,
            icon,
            color,
        } => {
            cli::handle_add(title, due, icon, color, &mut store)?;
        }
        Commands::Done { id, proof } => {
            cli::handle_done(id, proof, &mut store)?;
        }
        Commands::Rm { id } => {
            cli::handle_rm(id, &mut store)?;
        }
        Commands::List => {
            cli::handle_list(&store)?;
        }
        Commands::Subscribe => {
            cli::handle_subscribe(&mut store)?;
        }
        Commands::Unsubscribe => {
            cli::handle_unsubscribe(&mut store)?;
        }
        Commands::Status => {
            cli::handle_status(&mut store)?;
        }
    }

    Ok(())
}
