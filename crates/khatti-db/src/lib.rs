//! # khatti-db: Database Layer for the Khatti Storefront
//!
//! SQLite persistence for everything the storefront keeps beyond one
//! session: customer accounts, password resets and placed orders.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Khatti Storefront Data Flow                        │
//! │                                                                         │
//! │  Storefront command (place_order, sign_in, order_history)               │
//! │       │                                                                 │
//! │       ▼  AuthProvider / OrderBackend (khatti-core traits)               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     khatti-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ UserRepo      │    │ 001_init.sql │   │   │
//! │  │   │ SqlitePool    │◄───│ ResetRepo     │    │              │   │   │
//! │  │   │ ResetTokens   │    │ OrderRepo     │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir)/khatti.db                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`auth`] - Password hashing and reset tokens
//! - [`repository`] - Repository implementations (user, order)
//! - [`collaborators`] - `AuthProvider` and `OrderBackend` for [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khatti_core::AuthProvider;
//! use khatti_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/khatti.db")).await?;
//! let account = db.sign_in("asha@example.com", "khatti123").await?;
//! let orders = db.orders().list_for_user(&account.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod collaborators;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DEV_AUTH_SECRET};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::user::{PasswordResetRepository, UserRecord, UserRepository};
