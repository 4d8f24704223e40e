//! Daily breakout scanner - main entry point
//!
//! Runs one scan immediately, then every `schedule.interval_secs` until
//! Ctrl+C. `--once` runs a single cycle and exits.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use breakout_scanner::binance::BinanceFuturesClient;
use breakout_scanner::pipeline::BreakoutPipeline;
use breakout_scanner::scheduler::Scheduler;
use breakout_scanner::telegram::{LogNotifier, Notifier, TelegramNotifier};
use breakout_scanner::Config;

#[derive(Parser, Debug)]
#[command(name = "breakout-scanner")]
#[command(about = "Binance futures daily breakout scanner with Telegram alerts", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to JSON configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single scan cycle and exit
    #[arg(long)]
    once: bool,

    /// Log alerts instead of sending them to Telegram
    #[arg(long)]
    dry_run: bool,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_filename = format!(
        "scanner_{}.log",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = log_dir.join(&log_filename);

    // Set log level - filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never(log_dir, &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    // Same format without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn build_notifier(config: &Config, dry_run: bool) -> Result<Arc<dyn Notifier>> {
    if dry_run {
        warn!("Dry run: alerts are logged, not sent");
        return Ok(Arc::new(LogNotifier));
    }

    let notifier = TelegramNotifier::from_config(&config.telegram)
        .context("Failed to create Telegram notifier")?;
    info!("📱 Telegram notifier ready for chat {}", notifier.chat_id());
    Ok(Arc::new(notifier))
}

async fn run_async(cli: Cli, config: Config) -> Result<()> {
    let config = Arc::new(config);

    let market = Arc::new(BinanceFuturesClient::with_config(&config.binance));
    let notifier = build_notifier(&config, cli.dry_run)?;
    let pipeline = BreakoutPipeline::new(config.clone(), market, notifier);

    info!("🚀 Binance Breakout Scanner started (daily confirmed signals only)");
    info!(
        "Top {} gainers, min quote volume {}, interval {}s, seen cache {}",
        config.scanner.top_n,
        config.scanner.min_quote_volume,
        config.schedule.interval_secs,
        if config.seen_cache.enabled { "on" } else { "off" }
    );

    let mut scheduler = Scheduler::new(config.schedule.interval());
    if cli.once {
        scheduler = scheduler.with_max_cycles(1);
    }

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating shutdown..."),
            Err(e) => {
                warn!("Error setting up signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let cycles = scheduler.run(&pipeline, shutdown).await;
    info!("🛑 Scanner stopped after {} cycles", cycles);

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, &cli.log_dir)?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate(!cli.dry_run)
        .context("Invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run_async(cli, config))
}
