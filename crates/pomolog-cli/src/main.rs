use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pomolog_cli::commands::stats;
use pomolog_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Stats { log, json }) => {
            // An explicit --log skips config loading entirely
            let log_path = match log {
                Some(path) => path.clone(),
                None => {
                    let config = Config::load_from(cli.config.as_deref())
                        .context("failed to load configuration")?;
                    tracing::debug!(?config, "loaded configuration");
                    config.log_path
                }
            };

            let stdout = std::io::stdout();
            stats::run(&mut stdout.lock(), &log_path, *json)?;
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
