//! QST thermal threshold analyzer.
//!
//! # Commands
//!
//! - `analyze <SESSION>`: classify a patient's measurements against the
//!   normative data and print JSON or a Markdown report
//! - `reference --sex <SEX> --age <AGE>`: print the normative values for a
//!   patient's age bracket
//! - `config show|init`: inspect or create the config file
//!
//! Logs go to stderr; stdout carries only the result. The config file is
//! only loaded by the commands that read it, so a broken file never blocks
//! `reference` or `config init --force`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use qst_cli::config::{self, OutputFormat, QstConfig, OUTPUT_ENV};
use qst_cli::listing::reference_listing;
use qst_cli::session::{load_session, run_session};
use qst_core::models::patient::Sex;
use qst_export::report::{render_report, to_json};
use qst_norms::ReferenceTable;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qst")]
#[command(version)]
#[command(about = "Classify QST thermal thresholds against normative reference data")]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a patient session file
    Analyze {
        /// Path to the session JSON
        session: PathBuf,

        /// Output format; overrides QST_OUTPUT and the config file
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the normative values for a sex and age
    Reference {
        #[arg(long)]
        sex: Sex,

        #[arg(long)]
        age: u32,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json, config::configured_log_filter().as_deref());

    match cli.command {
        Commands::Analyze { session, format } => {
            let config = config::load_config()?.with_env_override(std::env::var(OUTPUT_ENV).ok())?;
            let session = load_session(&session)?;
            let analysis = run_session(&session, ReferenceTable::standard())?;
            let output = match format.unwrap_or(config.output) {
                OutputFormat::Json => to_json(&analysis)?,
                OutputFormat::Report => render_report(&analysis)?,
            };
            println!("{output}");
        }
        Commands::Reference { sex, age } => {
            let listing = reference_listing(ReferenceTable::standard(), sex, age)?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Config { action } => run_config(action)?,
    }

    Ok(())
}

fn run_config(action: ConfigAction) -> Result<()> {
    let path = config::config_path()?;
    match action {
        ConfigAction::Show => {
            let loaded = config::load_config()?;
            println!("# {}", path.display());
            if let Ok(raw) = std::env::var(OUTPUT_ENV) {
                println!("# {OUTPUT_ENV}={raw} overrides output for analyze");
            }
            println!("{}", serde_json::to_string_pretty(&loaded)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(eyre::eyre!(
                    "config already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
            let written = config::save_config(&QstConfig::default())?;
            println!("{}", written.display());
        }
    }
    Ok(())
}

fn init_tracing(json: bool, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
