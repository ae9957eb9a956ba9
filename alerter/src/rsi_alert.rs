//! # RSI Alert Service
//!
//! Runs the gate -> fetch -> dispatch invocation either once (`--once`,
//! for externally scheduled triggers where the process exit code is the
//! invocation result) or on an in-process cron schedule evaluated in the
//! exchange's time zone.

use anyhow::Result;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, EnvFilter};

use tokio::time::{sleep_until, Duration, Instant};
use tokio_cron_scheduler::{JobBuilder, JobScheduler};

use lib_common::{AlerterConfig, Invocation, Mailer, SmtpMailer};

// load .env files before anything else
use static_init::dynamic;

#[dynamic]
static DOTENV_INIT: () = {
    // Set up environment variables
    dotenvy::dotenv().ok();
};

#[derive(Parser, Debug)]
#[command(name = "rsi_alert", about = "SPY RSI threshold alerting service")]
struct Cli {
    /// Run a single invocation and exit; failures surface in the exit code.
    #[arg(long)]
    once: bool,

    /// Path to the JSON configuration file.
    #[arg(long, env = "ALERTER_CONFIG")]
    config: Option<PathBuf>,
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Get log level from environment variable or use default
    let log_level: String = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    // Get log directory from environment variable or use default
    let log_dir: String = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    // Configure file appender for rotating log files daily
    let file_appender = rolling::daily(&log_dir, "rsi_alert");
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    // Create console layer for stdout
    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    // Create JSON-formatted file layer
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    // Create environment filter from log level
    let env_filter: EnvFilter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))?;

    // Combine all layers
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", log_level);
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The guard keeps the non-blocking file writer alive until exit.
    let _logging_guard = setup_logging()?;

    let config = AlerterConfig::load(cli.config.as_deref())?;
    info!(
        timezone = %config.exchange_timezone,
        threshold = config.rsi_threshold,
        url = %config.rsi_api_url,
        "Configuration resolved"
    );

    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::from_config(&config)?);
    let invocation = Arc::new(Invocation::from_config(&config, mailer)?);

    if cli.once {
        let outcome = invocation.run_once().await?;
        info!(?outcome, "Invocation complete");
        return Ok(());
    }

    run_scheduled(config, invocation).await
}

/// Installs the cron job in the exchange's zone and parks the process.
///
/// Tick failures are logged and the schedule keeps running; retry policy
/// belongs to whatever supervises this process, not to the invocation.
async fn run_scheduled(config: AlerterConfig, invocation: Arc<Invocation>) -> Result<()> {
    let timezone = config.timezone()?;
    let scheduler = JobScheduler::new().await?;

    let job = JobBuilder::new()
        .with_timezone(timezone)
        .with_cron_job_type()
        .with_schedule(config.cron_schedule.as_str())?
        .with_run_async(Box::new(move |_uuid, _lock| {
            let invocation = invocation.clone();
            Box::pin(async move {
                match invocation.run_once().await {
                    Ok(outcome) => info!(?outcome, "Invocation complete"),
                    Err(e) => error!(error = %e, "Invocation failed"),
                }
            })
        }))
        .build()?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!(
        cron = %config.cron_schedule,
        zone = %config.exchange_timezone,
        "Scheduler started"
    );

    // Keep the program running
    loop {
        sleep_until(Instant::now() + Duration::from_secs(60)).await;
    }
}
