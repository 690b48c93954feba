use clap::Parser;
use siga_cli::{load_siga_config, Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

use crate::commands::util::configure_threads;

fn main() {
    let cli = Cli::parse();

    let config = match load_siga_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let config_level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };
    let level = cli.log_level.unwrap_or(config_level);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    configure_threads(&cli.threads);

    let result = match &cli.command {
        Commands::Normalize {
            input,
            output,
            encoding,
            diagnostics,
        } => commands::normalize::handle(
            &config,
            input,
            output.as_deref(),
            encoding.as_deref(),
            diagnostics.as_deref(),
        ),
        Commands::Import {
            input,
            store,
            encoding,
        } => commands::import::handle(&config, input, store, encoding.as_deref()),
        Commands::Summary {
            input,
            by,
            types,
            json,
            encoding,
        } => commands::summary::handle(
            &config,
            input,
            *by,
            types.as_deref(),
            *json,
            encoding.as_deref(),
        ),
        Commands::Map {
            input,
            output,
            format,
            types,
            encoding,
        } => commands::map::handle(
            &config,
            input,
            output.as_deref(),
            *format,
            types.as_deref(),
            encoding.as_deref(),
        ),
        Commands::Codes => commands::codes::handle(&config),
        Commands::Completions { shell, out } => {
            commands::completions::handle(*shell, out.as_deref())
        }
    };

    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
