//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Collaborator call (sign_in, create_order, ...)                         │
//! │       │                                                                 │
//! │       │  db.orders().list_for_user(user_id)                             │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── create(&self, new_order)                                           │
//! │  ├── insert_items(&self, order_id, items)                               │
//! │  ├── list_for_user(&self, user_id)                                      │
//! │  └── items_for_orders(&self, ids)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts
//! - [`PasswordResetRepository`](user::PasswordResetRepository) - Single-use reset tokens
//! - [`OrderRepository`](order::OrderRepository) - Orders and order items

pub mod order;
pub mod user;
