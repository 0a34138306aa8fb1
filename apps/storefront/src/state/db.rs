//! # Database State
//!
//! Holds the SQLite collaborators for the lifetime of the shell.

use khatti_db::Database;

/// Wrapper around `Database` for command injection.
///
/// `Database` implements both `AuthProvider` and `OrderBackend`; commands
/// take those traits, and the shell hands them [`DbState::inner`].
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
