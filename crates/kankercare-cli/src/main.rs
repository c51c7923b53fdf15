//! KankerCare CLI
//!
//! Command-line front end for the KankerCare patient intake pipeline.
//!
//! # Usage
//!
//! ```bash
//! kankercare intake -f pasien.json --upload ct-scan.pdf
//! kankercare validate --form register -f daftar.json
//! kankercare login --email pasien@email.com
//! kankercare consult -f keluhan.json --doctor dr-amanda --date 2025-03-10 --time 10:00
//! kankercare doctors --format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "kankercare")]
#[command(author = "KankerCare")]
#[command(version)]
#[command(about = "KankerCare patient intake command line interface", long_about = None)]
struct Cli {
    /// Workflow webhook URL, overrides the config file
    #[arg(long, env = "KANKERCARE_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Realtime database URL, overrides the config file
    #[arg(long, env = "KANKERCARE_DATABASE_URL")]
    database_url: Option<String>,

    /// Realtime database auth token
    #[arg(long, env = "KANKERCARE_DATABASE_AUTH", hide_env_values = true)]
    database_auth: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "text")]
    format: output::OutputFormat,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a patient record through the intake wizard and submit it
    Intake {
        /// JSON file holding the patient intake record
        #[arg(short, long)]
        file: PathBuf,
        /// Supporting document to attach (PDF, JPG or PNG, max 10MB)
        #[arg(short, long = "upload")]
        uploads: Vec<PathBuf>,
        /// Submit to in-memory sinks instead of the configured endpoints
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a form without submitting it
    Validate {
        #[arg(long, value_enum)]
        form: FormKind,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "KANKERCARE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// Create an account
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "KANKERCARE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        agree_terms: bool,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Session,
    /// Book a consultation with a specialist
    Consult {
        /// JSON file holding the consultation form
        #[arg(short, long)]
        file: PathBuf,
        /// Doctor id, see `kankercare doctors`
        #[arg(long)]
        doctor: Option<String>,
        /// Consultation date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Time slot (HH:MM)
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List bookable doctors and their slots
    Doctors,
    /// List the fixed options offered by the forms
    Options,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormKind {
    Login,
    Register,
    Intake,
    Consultation,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Set the workflow webhook URL
    SetWebhook { url: String },
    /// Set the realtime database URL and auth token
    SetDatabase {
        url: String,
        #[arg(long)]
        auth: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
