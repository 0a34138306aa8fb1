//! # Khatti Storefront Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from the environment
//! 3. Connect to database & run migrations
//! 4. Load the catalog
//! 5. Read shell commands from stdin

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(err) = khatti_storefront_lib::run().await {
        eprintln!("khatti-storefront: {}", err);
        std::process::exit(1);
    }
}
