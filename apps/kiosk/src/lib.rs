//! # Smart Basket Kiosk Library
//!
//! Wires the catalog database, scan pipeline and basket controller to a
//! line-oriented console.
//!
//! ## Modules
//! - [`input`] - Parses console lines into scans and commands
//! - [`observer`] - Renders basket events to stdout
//! - [`error`] - Application error type
//!
//! ## Shutdown
//! ```text
//! :quit / EOF ──► drop scan sender ──► pipeline drains & exits
//!             ──► handle.shutdown() ──► controller returns session
//!             ──► db.close()
//! ```

pub mod error;
pub mod input;
pub mod observer;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use basket_core::BasketSession;
use basket_db::{Database, DbConfig};
use basket_engine::{
    BasketController, BasketHandle, CachingCatalog, CatalogResolver, ChannelScanSource,
    DatabaseCatalog, EngineError, KioskConfig, RawScan, ScanPipeline,
};

pub use error::{KioskError, KioskResult};
use input::{parse_input, KioskInput, USAGE};
use observer::ConsoleObserver;

// =============================================================================
// Command-Line Arguments
// =============================================================================

/// Parsed command-line arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KioskArgs {
    /// Explicit config file (`--config <path>`).
    pub config: Option<PathBuf>,

    /// Catalog database override (`--db <path>`).
    pub db: Option<PathBuf>,

    /// Print usage and exit (`--help`).
    pub help: bool,
}

impl KioskArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> KioskResult<Self> {
        let mut parsed = KioskArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => parsed.config = Some(Self::value(&arg, args.next())?),
                "--db" => parsed.db = Some(Self::value(&arg, args.next())?),
                "--help" | "-h" => parsed.help = true,
                other => {
                    return Err(KioskError::InvalidArgument(format!(
                        "Unknown argument: {}",
                        other
                    )))
                }
            }
        }

        Ok(parsed)
    }

    fn value(flag: &str, value: Option<String>) -> KioskResult<PathBuf> {
        value
            .map(PathBuf::from)
            .ok_or_else(|| KioskError::InvalidArgument(format!("{} needs a value", flag)))
    }
}

const ARGS_USAGE: &str = "\
Usage: basket-kiosk [--config <path>] [--db <path>]

  --config <path>   kiosk.toml to load (default: platform config dir)
  --db <path>       catalog database file (overrides catalog.database_path)";

// =============================================================================
// Entry Point
// =============================================================================

/// Runs the kiosk until `:quit` or end of input.
pub async fn run() -> KioskResult<()> {
    let args = KioskArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}\n\n{}", ARGS_USAGE, USAGE);
        return Ok(());
    }

    init_tracing();
    info!("Starting Smart Basket kiosk");

    let mut config = KioskConfig::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.catalog.database_path = Some(db);
    }

    let db = open_catalog(&config).await?;
    let result = serve(&config, db.clone()).await;
    db.close().await;

    info!("Kiosk stopped");
    result
}

async fn open_catalog(config: &KioskConfig) -> KioskResult<Database> {
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path))
        .await
        .map_err(KioskError::CatalogUnavailable)?;

    let count = db.catalog().count().await?;
    if count == 0 {
        warn!("Catalog is empty; run the seed binary to load products");
    } else {
        info!(products = count, "Catalog ready");
    }

    Ok(db)
}

fn build_resolver(config: &KioskConfig, db: Database) -> Arc<dyn CatalogResolver> {
    let catalog = DatabaseCatalog::new(db);
    if config.catalog.cache_lookups {
        debug!("Catalog lookups are cached");
        Arc::new(CachingCatalog::new(catalog))
    } else {
        Arc::new(catalog)
    }
}

async fn serve(config: &KioskConfig, db: Database) -> KioskResult<()> {
    let session = BasketSession::with_budget(config.initial_budget()?)
        .with_checkout_header(config.store.checkout_header.clone());

    let (scan_tx, source) = ChannelScanSource::new(config.scanner.channel_capacity);
    let (pipeline, resolved) =
        ScanPipeline::spawn_with(source, build_resolver(config, db), config.pipeline_options());
    let (controller, handle) = BasketController::spawn(
        session,
        resolved,
        Arc::new(ConsoleObserver::new(&config.store)),
        config.controller_options(),
    );

    let result = console_loop(&scan_tx, &handle).await;

    drop(scan_tx);
    pipeline.await?;
    if let Err(e) = handle.shutdown().await {
        debug!(error = %e, "Controller already stopped");
    }
    let session = controller.await?;
    info!(units = session.ledger().len(), "Basket closed");

    result
}

// =============================================================================
// Console Loop
// =============================================================================

async fn console_loop(scans: &mpsc::Sender<RawScan>, handle: &BasketHandle) -> KioskResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_input(&line) else {
            continue;
        };

        match input {
            KioskInput::Scan(scan) => {
                if scans.send(scan).await.is_err() {
                    warn!("Scan pipeline stopped; leaving console loop");
                    break;
                }
            }
            KioskInput::Quit => break,
            KioskInput::Help => println!("{}", USAGE),
            KioskInput::Unknown(name) => println!("Unknown command :{} (try :help)", name),
            command => run_command(command, handle).await?,
        }
    }

    Ok(())
}

async fn run_command(command: KioskInput, handle: &BasketHandle) -> KioskResult<()> {
    let result = match command {
        KioskInput::Budget(amount) => handle.set_budget(amount).await.map(drop),
        KioskInput::Checkout => handle.checkout().await.map(drop),
        KioskInput::Reset => handle.reset().await.map(drop),
        KioskInput::Show => handle.snapshot().await.map(|snapshot| {
            println!(
                "{} unit(s), total {}, status {}",
                snapshot.entry_count,
                snapshot.total().to_decimal_string(),
                snapshot.status
            );
        }),
        KioskInput::Json => {
            let snapshot = handle.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        _ => Ok(()),
    };

    match result {
        // The observer has already shown the notice
        Err(e) if e.is_user_error() => Ok(()),
        Err(EngineError::Core(e)) => {
            warn!(error = %e, "Command rejected");
            println!("!! {}", e);
            Ok(())
        }
        Err(EngineError::ChannelClosed(msg)) => Err(KioskError::TaskFailed(msg)),
        other => other.map_err(KioskError::from),
    }
}

/// Initializes the tracing subscriber; logs go to stderr so stdout stays
/// the customer display.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket=trace` - Trace for basket crates only
/// - Default: `info,basket=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,basket=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> KioskResult<KioskArgs> {
        KioskArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--config", "kiosk.toml", "--db", "/tmp/catalog.db"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("kiosk.toml")));
        assert_eq!(parsed.db, Some(PathBuf::from("/tmp/catalog.db")));
        assert!(!parsed.help);

        assert!(args(&["-h"]).unwrap().help);
        assert_eq!(args(&[]).unwrap(), KioskArgs::default());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(
            args(&["--db"]),
            Err(KioskError::InvalidArgument(_))
        ));
        assert!(matches!(
            args(&["--verbose"]),
            Err(KioskError::InvalidArgument(_))
        ));
    }
}
