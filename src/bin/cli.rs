//! Daily Digest CLI
//!
//! Local execution entry point, meant to be run once a day by a scheduler.

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use daily_digest::{
    error::Result,
    models::{Config, ENV_CMC_API_KEY, StoreBackend},
    normalize::CoinMarketCalExtractor,
    pipeline::{self, DigestOrchestrator, Sources},
    services::{
        CoinMarketCalClient, CoinMarketCapClient, DigestDelivery, FileDelivery, RedditClient,
    },
    storage::{self, IdentityStore, LocalIdentityStore, MemoryIdentityStore, Outbox},
    utils::http,
};

/// Daily Digest - forum, price, and calendar news by email
#[derive(Parser, Debug)]
#[command(
    name = "digest",
    version,
    about = "Daily news digest for forums, coin prices, and coin events"
)]
struct Cli {
    /// Path to storage directory containing config.toml and local state
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build today's digest, record new threads, and send it
    Run {
        /// Write the digest to this HTML file instead of sending mail
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build today's digest into a file without recording any threads
    Preview {
        /// Output file (default: {storage_dir}/preview.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Retry delivery of digests parked in the outbox
    Resend,

    /// Validate configuration
    Validate,

    /// Show configuration and local state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the SMTP transport from config.
#[cfg(feature = "smtp")]
fn mail_delivery(config: &Config) -> Result<Box<dyn DigestDelivery>> {
    config.validate_email()?;
    Ok(Box::new(daily_digest::services::SmtpMailer::from_config(
        &config.email,
    )?))
}

#[cfg(not(feature = "smtp"))]
fn mail_delivery(_config: &Config) -> Result<Box<dyn DigestDelivery>> {
    Err(daily_digest::error::AppError::config(
        "mail delivery requires the `smtp` feature; use --output instead",
    ))
}

/// Wire up the HTTP sources and run one digest cycle.
async fn run_cycle(
    config: &Config,
    store: &dyn IdentityStore,
    delivery: &dyn DigestDelivery,
    outbox: Option<&Outbox>,
) -> Result<()> {
    let client = http::create_async_client(&config.http)?;
    let forum = RedditClient::new(client.clone(), &config.forum);
    let market = CoinMarketCapClient::new(client.clone(), &config.market);
    let calendar = CoinMarketCalClient::new(client, &config.calendar);
    let extractor = CoinMarketCalExtractor::new()?;

    let sources = Sources {
        forum: &forum,
        market: &market,
        calendar: &calendar,
        extractor: &extractor,
    };
    let orchestrator = DigestOrchestrator::new(config, sources, store);

    let today = Local::now().date_naive();
    pipeline::run_digest(&orchestrator, today, delivery, outbox).await?;
    Ok(())
}

fn resolve(storage_dir: &Path, path: &Path) -> PathBuf {
    storage_dir.join(path)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Daily Digest starting...");

    // Load configuration; secrets from the environment win over the file
    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let outbox = Outbox::new(resolve(&cli.storage_dir, &config.outbox.dir));

    match cli.command {
        Command::Run { output } => {
            config.validate()?;

            let delivery: Box<dyn DigestDelivery> = match output {
                Some(path) => Box::new(FileDelivery::new(path)),
                None => mail_delivery(&config)?,
            };
            let store = storage::open_store(&config.store, &cli.storage_dir).await?;

            run_cycle(&config, store.as_ref(), delivery.as_ref(), Some(&outbox)).await?;
        }

        Command::Preview { output } => {
            config.validate()?;

            let path = output.unwrap_or_else(|| cli.storage_dir.join("preview.html"));
            let delivery = FileDelivery::new(&path);
            let store = MemoryIdentityStore::new();

            run_cycle(&config, &store, &delivery, None).await?;
            log::info!("Preview written to {}", path.display());
        }

        Command::Resend => {
            let delivery = mail_delivery(&config)?;
            let sent = pipeline::run_resend(&outbox, delivery.as_ref()).await?;
            log::info!("Resent {sent} digest(s)");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match config.validate_email() {
                Ok(()) => log::info!("✓ Email settings OK"),
                Err(e) => log::warn!("Email settings incomplete: {}", e),
            }
            if config.market.api_key.is_empty() {
                log::warn!("market.api_key is empty; set {}", ENV_CMC_API_KEY);
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!(
                "Config: {}",
                if config_path.exists() {
                    "exists"
                } else {
                    "not found (using defaults)"
                }
            );
            log::info!(
                "Forum groups: {} | Symbols: {} | Calendar coins: {}",
                config.forum.groups.len(),
                config.market.symbols.len(),
                config.calendar.coins.len()
            );

            match config.store.backend {
                StoreBackend::Local => {
                    let ledger = resolve(&cli.storage_dir, &config.store.ledger);
                    let store = LocalIdentityStore::open(&ledger).await?;
                    log::info!(
                        "Ledger {}: {} seen threads",
                        ledger.display(),
                        store.len().await
                    );
                }
                StoreBackend::Memory => log::info!("Identity store: memory"),
                StoreBackend::Postgres => log::info!("Identity store: postgres"),
            }

            let parked = outbox.pending().await?;
            log::info!("Outbox {}: {} parked digest(s)", outbox.dir().display(), parked.len());
        }
    }

    log::info!("Done!");

    Ok(())
}
