//! Alertboard CLI
//!
//! Command-line interface for the Alertboard notification registry.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use alertboard::config::LoggingConfig;
use alertboard::models::{timeout_from_millis, Alert, AlertKind};
use alertboard::registry::{AlertEvent, AlertRegistry, RemovalReason};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

/// Alertboard - transient, timed notifications
#[derive(Parser)]
#[command(name = "alertboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALERTBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard
    Dashboard {
        /// Refresh rate in milliseconds
        #[arg(long)]
        refresh: Option<u64>,
    },

    /// Register a handful of alerts and print changes until they expire
    Demo,

    /// Register a single alert and wait for it to expire
    Notify {
        /// Alert type (success, error, warning, info)
        kind: AlertKind,

        /// Alert title
        title: String,

        /// Alert text
        text: String,

        /// Timeout in milliseconds; zero or negative keeps the alert
        #[arg(long, allow_negative_numbers = true)]
        timeout: Option<i64>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    // Load configuration
    let config = match alertboard::Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging, cli.verbose);
    info!("Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Dashboard { refresh } => run_dashboard(config, refresh).await,
        Commands::Demo => run_demo(config, cli.format).await,
        Commands::Notify {
            kind,
            title,
            text,
            timeout,
        } => run_notify(config, kind, title, text, timeout, cli.format).await,
        Commands::Config => print_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stderr keeps stdout free for command output and the TUI.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_dashboard(config: alertboard::Config, refresh: Option<u64>) -> anyhow::Result<()> {
    let refresh = refresh.unwrap_or(config.tui.refresh_rate_ms);
    info!("Starting TUI dashboard with {}ms refresh", refresh);

    let registry = AlertRegistry::new(config.alerts)?;
    let mut app = alertboard::tui::App::new(registry).with_refresh_rate(refresh);
    app.run().await?;

    Ok(())
}

async fn run_demo(config: alertboard::Config, format: OutputFormat) -> anyhow::Result<()> {
    let registry = AlertRegistry::new(config.alerts)?;
    let mut events = registry.subscribe();
    let ms = Duration::from_millis;

    registry.show_info("Demo started", "Timed alerts expire one by one", Some(ms(400)));
    registry.show_success("Build passed", "All 42 checks are green", Some(ms(800)));
    registry.show_warning("Cache is cold", "First requests may be slow", Some(ms(1200)));
    registry.show_error("Deploy failed", "Rollout to eu-west stalled", Some(ms(1600)));
    let pinned = registry.show_info("Pinned", "Stays until the board is cleared", Some(Duration::ZERO));
    info!(alert_id = %pinned, "Demo alerts registered");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    print_event(&event, format)?;
                    if registry.alerts().iter().all(Alert::is_persistent) {
                        break;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, stopping demo");
                break;
            }
        }
    }

    registry.clear();
    while let Ok(event) = events.try_recv() {
        print_event(&event, format)?;
    }

    Ok(())
}

async fn run_notify(
    config: alertboard::Config,
    kind: AlertKind,
    title: String,
    text: String,
    timeout: Option<i64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let registry = AlertRegistry::new(config.alerts)?;
    let mut events = registry.subscribe();

    let id = registry.add(kind, title, text, timeout.map(timeout_from_millis));

    if let Some(alert) = registry.get(&id) {
        print_event(&AlertEvent::Added(alert.clone()), format)?;
        if alert.is_persistent() {
            return Ok(());
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event @ AlertEvent::Removed { .. }) => {
                    print_event(&event, format)?;
                    break;
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                registry.remove(&id);
                break;
            }
        }
    }

    Ok(())
}

fn print_config(config: &alertboard::Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn print_event(event: &AlertEvent, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Text => match event {
            AlertEvent::Added(alert) => {
                let lifetime = alert.expires_after().map_or_else(
                    || "sticky".to_string(),
                    |after| humantime::format_duration(after).to_string(),
                );
                println!(
                    "+ {:<8} {}: {} [{}, {}]",
                    alert.kind, alert.title, alert.text, alert.id, lifetime
                );
            }
            AlertEvent::Removed { id, reason } => {
                let reason = match reason {
                    RemovalReason::Dismissed => "dismissed",
                    RemovalReason::Expired => "expired",
                };
                println!("- {id} {reason}");
            }
            AlertEvent::Cleared { count } => println!("x cleared {count} alert(s)"),
        },
    }
    Ok(())
}
