//! # Khatti Storefront Library
//!
//! Commands, state and the line shell for the Khatti storefront.
//!
//! ## Module Organization
//! ```text
//! khatti_storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & shell loop)
//! ├── shell.rs        ◄─── Command grammar and text rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── catalog.rs  ◄─── Loaded product catalog
//! │   ├── store.rs    ◄─── Cart and wishlist
//! │   ├── session.rs  ◄─── Signed-in shopper
//! │   ├── checkout.rs ◄─── Applied coupon
//! │   ├── toast.rs    ◄─── Pending toasts
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Home, browse, product detail
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── wishlist.rs ◄─── Wishlist commands
//! │   ├── checkout.rs ◄─── Coupon, summary, place order
//! │   ├── orders.rs   ◄─── Order history
//! │   └── auth.rs     ◄─── Sign up / in / out, password reset
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! Multiple focused state types instead of one `AppState`; each command
//! takes only the state it needs.

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use khatti_db::{migrations, Database};
use shell::{Flow, Shell};
use state::{CatalogState, ConfigState, DbState};

/// Runs the storefront shell until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • KHATTI_* environment variables over built-in defaults             │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • KHATTI_CATALOG_PATH or the bundled catalog                        │
/// │                                                                         │
/// │  5. Read Commands ────────────────────────────────────────────────────► │
/// │     • One per line from stdin, output to stdout                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Khatti Storefront");

    let config = ConfigState::from_env();

    let db_config = config.db_config()?;
    info!(db_path = ?db_config.database_path, "Database path determined");

    let db = Database::new(db_config).await?;
    let (total, applied) = migrations::migration_status(db.pool()).await?;
    info!(total, applied, "Schema ready");

    let catalog = CatalogState::load(config.catalog_path.as_deref())?;

    let shell = Shell::new(DbState::new(db.clone()), catalog, config);
    info!("State initialized");

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}\n> ", shell.banner()).as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = shell.handle_line(&line).await;
        if !outcome.output.is_empty() {
            stdout.write_all(outcome.output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        if outcome.flow == Flow::Quit {
            break;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    stdout.flush().await?;

    db.close().await;
    info!("Storefront closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=khatti=trace` - Show trace for khatti crates only
/// - Default: INFO level
///
/// Logs go to stderr so they never mix with shell output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,khatti=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
