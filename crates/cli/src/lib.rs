pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "upsell",
    about = "Rental upsell operator CLI",
    long_about = "Inspect configuration, check catalog readiness, refresh the catalog cache, and evaluate booking offers offline.",
    after_help = "Examples:\n  upsell doctor --json\n  upsell config\n  upsell fetch\n  upsell offer --request booking.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog cache readiness, and protection tier count")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Fetch the live rental catalog and rewrite the local cache")]
    Fetch,
    #[command(about = "Evaluate a booking request against the cached catalog")]
    Offer {
        #[arg(long, value_name = "FILE", help = "Path to a booking request JSON document")]
        request: PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Fetch => commands::fetch::run(),
        Command::Offer { request } => commands::offer::run(&request),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
