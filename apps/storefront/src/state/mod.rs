//! # State Module
//!
//! Storefront state, split into focused types so each command takes only
//! what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  run() builds every state object once and passes them by reference      │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┼─────────┬──────────────┬─────────────┐   │
//! │     ▼              ▼         ▼         ▼              ▼             ▼   │
//! │  DbState     CatalogState StoreState SessionState CheckoutState ToastState
//! │  Database    Catalog      Arc<Mutex< Option<      Option<       Vec<    │
//! │  (pool)      (read-only)   Store>>   UserAccount> AppliedCoupon> Toast> │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • DbState: Database has an internal connection pool                    │
//! │  • CatalogState, ConfigState: read-only after initialization            │
//! │  • Everything else: behind a Mutex or RwLock                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod checkout;
mod config;
mod db;
mod session;
mod store;
mod toast;

pub use catalog::CatalogState;
pub use checkout::CheckoutState;
pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;
pub use store::StoreState;
pub use toast::{Toast, ToastState};
