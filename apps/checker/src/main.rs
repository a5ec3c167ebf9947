//! Price Checker
//!
//! Runs one price check over every tracked item and exits. Meant to be
//! started by an external scheduler (cron, systemd timer, ...).

mod config;

use clap::Parser;
use config::AppConfig;
use pricewatch_alerts::{
    AlertPublisher, Database, DbError, LogPublisher, TelegramConfig, TelegramPublisher,
};
use pricewatch_engine::{CheckerConfig, PriceChecker, RunStatus};
use pricewatch_feeds::{CoinGeckoClient, FeedError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Price Checker CLI
#[derive(Parser, Debug)]
#[command(name = "price-checker")]
#[command(about = "Check tracked prices and alert on drops below target", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log level: trace, debug, info, warn, error (overrides the config file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Database URL (overrides config file and DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Error, Debug)]
enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Price client error: {0}")]
    Feed(#[from] FeedError),
}

impl StartupError {
    fn status(&self) -> RunStatus {
        match self {
            StartupError::Database(_) => RunStatus::database_error(),
            StartupError::Feed(_) => RunStatus::failure("Startup Error"),
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Logs go to stderr so stdout carries only the run status.
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(parse_level(level)).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Pick the notification channel: Telegram when a token and topic are set,
/// otherwise alerts only go to the log.
fn build_publisher(config: &AppConfig) -> Arc<dyn AlertPublisher> {
    match TelegramConfig::from_env() {
        Some(telegram) if !config.notification.topic.is_empty() => {
            info!("  Notifications: Telegram");
            Arc::new(TelegramPublisher::new(&telegram))
        }
        Some(_) => {
            warn!("  Notifications: log only (no topic configured)");
            Arc::new(LogPublisher)
        }
        None => {
            warn!(
                "  Notifications: log only ({} not set)",
                TelegramConfig::TOKEN_VAR
            );
            Arc::new(LogPublisher)
        }
    }
}

async fn build_checker(config: &AppConfig) -> Result<PriceChecker, StartupError> {
    let db = Database::connect(&config.database_url).await?;
    let source = CoinGeckoClient::new(config.price_api.clone())?;
    let publisher = build_publisher(config);

    Ok(PriceChecker::new(
        Arc::new(db),
        Arc::new(source),
        publisher,
        CheckerConfig::new(config.notification.topic.clone()),
    ))
}

async fn run(args: &Args) -> RunStatus {
    let mut config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(args.log_level.as_deref().unwrap_or("info"));
            error!("{}", e);
            return RunStatus::failure("Configuration Error");
        }
    };
    config.apply_env();
    if let Some(url) = &args.database_url {
        config.database_url = url.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    init_logging(&config.log_level);

    info!("Price checker starting...");
    info!("  Database: {}", config.database_url);
    info!("  Price API: {}", config.price_api.base_url);

    match build_checker(&config).await {
        Ok(checker) => checker.invoke().await,
        Err(e) => {
            error!("Failed to start: {}", e);
            e.status()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let status = run(&args).await;

    match serde_json::to_string(&status) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to encode status: {}", e),
    }

    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["price-checker"]);
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert!(args.log_level.is_none());
        assert!(args.database_url.is_none());

        let args = Args::parse_from([
            "price-checker",
            "--config",
            "prod.json",
            "-l",
            "debug",
            "--database-url",
            "sqlite::memory:",
        ]);
        assert_eq!(args.config, PathBuf::from("prod.json"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_startup_error_status() {
        let err = StartupError::Database(DbError::ItemNotFound("x".to_string()));
        assert_eq!(err.status(), RunStatus::database_error());

        let err = StartupError::Feed(FeedError::ConnectionFailed("tls".to_string()));
        assert_eq!(err.status().status_code, 500);
    }

    #[tokio::test]
    async fn test_build_checker_with_memory_database() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let checker = build_checker(&config).await.unwrap();
        // Fresh table, so the run completes without any price lookups
        assert_eq!(checker.invoke().await, RunStatus::complete());
    }
}
