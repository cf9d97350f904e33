//! Wavseal CLI
//!
//! Command-line interface for signing and verifying WAV audio.

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{debug, error};

use wavseal::cli::{commands, Cli, Commands};
use wavseal::{Result, WavsealConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Wavseal v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{} ({})", e, e.error_code());
            eprintln!("Error: {}", e);
            if let Some(suggestion) = e.recovery_suggestions().first() {
                eprintln!("Hint: {}", suggestion);
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = WavsealConfig::load(cli.config.as_deref())?;
    if let Some(order) = cli.byte_order {
        config.byte_order = order;
    }

    match cli.command {
        Commands::GenerateKeys {
            signing_key,
            verifying_key,
        } => {
            if let Some(path) = signing_key {
                config.keys.signing_key_path = path;
            }
            if let Some(path) = verifying_key {
                config.keys.verifying_key_path = path;
            }
            commands::generate_keys(&config)?;
        }
        Commands::ExportPublic { verifying_key } => {
            if let Some(path) = verifying_key {
                config.keys.verifying_key_path = path;
            }
            commands::export_public(&config)?;
        }
        Commands::Sign {
            input,
            output,
            signing_key,
        } => {
            if let Some(path) = signing_key {
                config.keys.signing_key_path = path;
            }
            commands::sign(&config, &input, output.as_deref())?;
        }
        Commands::Verify {
            input,
            key,
            verifying_key,
        } => {
            if let Some(path) = verifying_key {
                config.keys.verifying_key_path = path;
            }
            if !commands::verify(&config, &input, key.as_deref())? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Embed {
            input,
            message,
            output,
        } => commands::embed(&config, &input, &message, output.as_deref())?,
        Commands::Extract { input } => commands::extract(&config, &input)?,
    }

    Ok(ExitCode::SUCCESS)
}
