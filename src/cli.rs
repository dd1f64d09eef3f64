//! Command-line interface for `WeatherDigest`
//!
//! Parses arguments with clap and dispatches each subcommand to the
//! pipeline, the formatter or the scheduler.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::DigestConfig;
use crate::email::SmtpSender;
use crate::formatting::{FormatOptions, format_location};
use crate::models::{CombinedReport, Location, UnitSystem};
use crate::pipeline::{self, RunOptions};
use crate::schedule::Scheduler;
use crate::telemetry;
use crate::weather::PirateWeatherClient;

/// Multi-location weather forecast digests delivered by email
#[derive(Parser, Debug)]
#[command(name = "weatherdigest")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch every configured location and email the digest
    Send {
        /// Build the digest and print it instead of sending
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch every configured location and print the digest
    Preview {
        /// Print the HTML document instead of the text body
        #[arg(long)]
        html: bool,
    },
    /// Format a saved forecast response without calling the API
    Render {
        /// JSON file holding one forecast response
        #[arg(long, value_name = "FILE")]
        forecast: PathBuf,
        /// Location name shown in the report
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Unit system the forecast was requested in
        #[arg(long, default_value = "us")]
        units: UnitSystem,
        /// Print the HTML document instead of the text body
        #[arg(long)]
        html: bool,
    },
    /// Send the digest on the configured cron schedule until Ctrl-C
    Schedule,
    /// Validate the configuration and print a summary
    CheckConfig,
}

/// Load configuration, set up logging and run the chosen command.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = DigestConfig::load_from_path(cli.config.clone())?;
    telemetry::init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Send { dry_run } => send(&config, dry_run).await,
        Command::Preview { html } => preview(&config, html).await,
        Command::Render {
            forecast,
            name,
            lat,
            lon,
            units,
            html,
        } => render(&config, &forecast, Location::new(name, lat, lon), units, html),
        Command::Schedule => schedule(&config).await,
        Command::CheckConfig => check_config(&config),
    }
}

async fn send(config: &DigestConfig, dry_run: bool) -> Result<()> {
    if dry_run {
        if let Some(report) = build(config).await? {
            info!("Dry run; not sending \"{}\"", report.subject);
            println!("Subject: {}\n", report.subject);
            println!("{}", report.weather_info);
        }
        return Ok(());
    }

    let source = PirateWeatherClient::from_config(&config.weather)?;
    let sender = SmtpSender::from_config(&config.email)?;
    let requests = config.location_requests()?;
    let options = RunOptions::from_config(config)?;
    pipeline::run(&source, &sender, &requests, &options).await?;
    Ok(())
}

async fn preview(config: &DigestConfig, html: bool) -> Result<()> {
    if let Some(report) = build(config).await? {
        print_report(&report, html);
    }
    Ok(())
}

async fn build(config: &DigestConfig) -> Result<Option<CombinedReport>> {
    let source = PirateWeatherClient::from_config(&config.weather)?;
    let requests = config.location_requests()?;
    let options = RunOptions::from_config(config)?;
    Ok(pipeline::build_digest(&source, &requests, &options).await?)
}

fn print_report(report: &CombinedReport, html: bool) {
    if html {
        println!("{}", report.html_body);
    } else {
        println!("Subject: {}\n", report.subject);
        println!("{}", report.weather_info);
    }
}

fn render(
    config: &DigestConfig,
    forecast: &Path,
    location: Location,
    units: UnitSystem,
    html: bool,
) -> Result<()> {
    location.validate()?;
    let contents = std::fs::read_to_string(forecast)
        .with_context(|| format!("Failed to read forecast from {}", forecast.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", forecast.display()))?;

    let options = FormatOptions::new(config.fallback_timezone()?);
    let report = format_location(&location, units, raw, &options);
    if html {
        println!("{}", report.html_body);
    } else {
        println!("{}", report.weather_info);
    }
    Ok(())
}

async fn schedule(config: &DigestConfig) -> Result<()> {
    let scheduler = Scheduler::from_config(&config.schedule)?;
    let source = PirateWeatherClient::from_config(&config.weather)?;
    let sender = SmtpSender::from_config(&config.email)?;
    let requests = config.location_requests()?;
    let options = RunOptions::from_config(config)?;

    info!(
        "Scheduling weather digest for {} location(s) with '{}' ({})",
        requests.len(),
        config.schedule.cron,
        config.schedule.timezone
    );

    let (source, sender, requests, options) = (&source, &sender, &requests, &options);
    scheduler
        .run(|| async move {
            pipeline::run(source, sender, requests, options)
                .await
                .map(|_| ())
        })
        .await?;
    Ok(())
}

fn check_config(config: &DigestConfig) -> Result<()> {
    let locations = config.all_locations()?;
    println!("Configuration OK");
    println!(
        "  Weather API: {} (units: {}, api key: {})",
        config.weather.base_url,
        config.weather.units,
        if config.weather.api_key.is_some() { "set" } else { "missing" }
    );
    println!("  Locations: {}", locations.len());
    for location in &locations {
        println!("    - {location}");
    }
    println!(
        "  Email: {} recipient(s) via {} ({})",
        config.email.to.len(),
        config.email.smtp_host,
        config.email.tls
    );

    let scheduler = Scheduler::from_config(&config.schedule)?;
    match scheduler.next_after(Utc::now()) {
        Some(next) => println!(
            "  Schedule: '{}', next run {}",
            config.schedule.cron,
            next.format("%Y-%m-%d %H:%M %Z")
        ),
        None => println!("  Schedule: '{}', no upcoming runs", config.schedule.cron),
    }
    Ok(())
}
