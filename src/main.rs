use clap::{Parser, Subcommand};
use pair_rounds::commands::{generate, verify};
use pair_rounds::config::{LoggingSettings, Settings};
use pair_rounds::models::{ErrorResponse, Strategy, VerifyRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Pair Rounds - schedule pairings across rounds and verify rendered output
#[derive(Parser)]
#[command(name = "pair-rounds")]
#[command(version)]
#[command(about = "Schedule non-repeating pairings across rounds and verify rendered output")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML), layered over ./config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate rounds from a roster and write round_<n>.md files
    Generate {
        /// Generation strategy: rotation or similarity
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Number of rounds to generate
        #[arg(long)]
        rounds: Option<usize>,

        /// Roster CSV file (id, name, optional code/mbti columns)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Directory for the markdown files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Keep the roster in file order
        #[arg(long)]
        no_shuffle: bool,

        /// Keep table order as generated
        #[arg(long)]
        no_table_shuffle: bool,

        /// Print the run as JSON instead of console tables
        #[arg(long)]
        json: bool,
    },

    /// Check that no pair appears more than once across markdown match files
    Verify {
        /// Root directory containing match files
        root: String,

        /// File extension to scan
        #[arg(long, default_value = ".md")]
        ext: String,

        /// Minimal output (suitable for CI)
        #[arg(long)]
        quiet: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8, logging: &LoggingSettings) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn report_error(err: &anyhow::Error, json: bool) {
    error!("{:#}", err);
    if json {
        let body = ErrorResponse {
            error: "pair_rounds_error".to_string(),
            message: format!("{:#}", err),
        };
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("Error: {:#}", err),
        }
    } else {
        eprintln!("Error: {:#}", err);
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.command {
        Commands::Generate { .. } => Some(Settings::load(cli.config.as_deref())),
        Commands::Verify { .. } => None,
    };
    let logging = settings
        .as_ref()
        .and_then(|s| s.as_ref().ok())
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(cli.verbose, &logging);

    match cli.command {
        Commands::Generate {
            strategy,
            rounds,
            roster,
            output_dir,
            seed,
            no_shuffle,
            no_table_shuffle,
            json,
        } => {
            let settings = match settings {
                Some(Ok(settings)) => settings,
                Some(Err(e)) => {
                    report_error(&anyhow::Error::new(e), json);
                    return ExitCode::FAILURE;
                }
                None => Settings::default(),
            };
            info!("Configuration loaded successfully");

            let overrides = generate::GenerateOverrides {
                strategy,
                rounds,
                roster,
                output_dir,
                seed,
                no_shuffle,
                no_table_shuffle,
            };
            match generate::execute(&settings, &overrides, json) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    report_error(&e, json);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Verify { root, ext, quiet, json } => {
            let request = VerifyRequest {
                root,
                extension: ext,
                quiet,
            };
            match verify::execute(&request, json) {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::from(1),
                Err(e) => {
                    report_error(&e, json);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
