use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use civic_reporter::areas;
use civic_reporter::commands;
use civic_reporter::escalation;
use civic_reporter::geocode::{GeocoderConfig, ReverseGeocoder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use civic_reporter::session::Session;
use civic_reporter::shell;

#[derive(Parser)]
#[command(name = "civic-reporter")]
#[command(about = "Report civic issues and work them through the department hierarchy")]
#[command(version)]
struct Cli {
    /// Nominatim server used for reverse geocoding
    #[arg(long, global = true, env = "CIVIC_NOMINATIM_URL", default_value = DEFAULT_BASE_URL)]
    nominatim_url: String,

    /// Reverse-geocoding request timeout in seconds
    #[arg(long, global = true, env = "CIVIC_GEOCODE_TIMEOUT_SECS", default_value_t = 10)]
    geocode_timeout_secs: u64,

    /// User-Agent sent to the geocoding server
    #[arg(long, global = true, env = "CIVIC_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Pin the session clock (RFC 3339), e.g. for replaying scripts
    #[arg(long, global = true, env = "CIVIC_NOW", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Log output format
    #[arg(long, global = true, env = "CIVIC_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Shell,

    /// Replay a file of session commands
    Run {
        /// Script path; one command per line, '#' starts a comment
        script: PathBuf,
    },

    /// Look up the address for a coordinate
    Geocode {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Print the demo issues a session starts with, as JSON
    Seed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    let now = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 time: {}", e))?;
    if !escalation::supports_clock(now) {
        return Err("time must be between 1970 and late December 9999".to_string());
    }
    Ok(now)
}

/// Logs go to stderr so they never interleave with session output on stdout.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

impl Cli {
    fn geocoder_config(&self) -> GeocoderConfig {
        GeocoderConfig {
            base_url: self.nominatim_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.geocode_timeout_secs),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command.as_ref().unwrap_or(&Commands::Shell) {
        Commands::Shell => {
            let mut session = Session::new(&cli.geocoder_config(), cli.now)?;
            shell::run_interactive(&mut session, io::stdin().lock())
        }

        Commands::Run { script } => {
            let contents = fs::read_to_string(script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let mut session = Session::new(&cli.geocoder_config(), cli.now)?;
            let summary = shell::run_script(&mut session, &contents);
            tracing::info!(
                commands = summary.commands,
                failures = summary.failures,
                "script finished"
            );
            Ok(())
        }

        Commands::Geocode { lat, lng } => {
            let geocoder = ReverseGeocoder::new(&cli.geocoder_config())?;
            commands::geocode::run(&geocoder, *lat, *lng)
        }

        Commands::Seed => {
            let issues = areas::initial_issues(cli.now.unwrap_or_else(Utc::now));
            println!("{}", serde_json::to_string_pretty(&issues)?);
            Ok(())
        }
    }
}
