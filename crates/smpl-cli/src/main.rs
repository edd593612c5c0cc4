use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use smpl_cli::commands::{run, theme};
use smpl_cli::theme_store::LayeredThemeStore;
use smpl_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Run { json }) => {
            let config = load_config(&cli)?;
            run::run(&config, *json)?;
        }
        Some(Commands::Theme(action)) => {
            let config = load_config(&cli)?;
            let store = LayeredThemeStore::from_config(&config);
            theme::run(&mut std::io::stdout().lock(), &store, action)?;
        }
        Some(Commands::Format { ms }) => {
            println!("{}", smpl_core::format_time(*ms));
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
