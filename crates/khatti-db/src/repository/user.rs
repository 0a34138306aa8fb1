//! # User Repository
//!
//! Accounts and password reset bookkeeping.
//!
//! Emails arrive here already normalized (trimmed, lower-cased) by
//! `khatti_core::validation::validate_email`; the UNIQUE index on
//! `users.email` is the final guard against duplicate sign-ups.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khatti_core::UserAccount;

// =============================================================================
// Records
// =============================================================================

/// A `users` row, including the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserAccount {
    fn from(record: UserRecord) -> Self {
        UserAccount {
            id: record.id,
            email: record.email,
            full_name: record.full_name,
            created_at: record.created_at,
        }
    }
}

// =============================================================================
// User Repository
// =============================================================================

/// Repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` if the email is taken
    pub async fn insert(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> DbResult<UserRecord> {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %record.id, email = %record.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.full_name)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, email),
            other => other,
        })?;

        Ok(record)
    }

    /// Gets an account by email.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, full_name, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Number of accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Password Reset Repository
// =============================================================================

/// Tracks issued reset tokens so each can be used once.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    pool: SqlitePool,
}

impl PasswordResetRepository {
    /// Creates a new PasswordResetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PasswordResetRepository { pool }
    }

    /// Records an issued token by its jti.
    pub async fn record(
        &self,
        jti: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(jti = %jti, user_id = %user_id, "Recording password reset");

        sqlx::query(
            r#"
            INSERT INTO password_resets (id, user_id, expires_at, used_at, created_at)
            VALUES (?1, ?2, ?3, NULL, ?4)
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Marks a token used and updates the account password in one
    /// transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::AuthFailed)` if the token is unknown, expired, or was
    ///   already used
    pub async fn consume(&self, jti: &str, user_id: &str, password_hash: &str) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE password_resets SET used_at = ?3
            WHERE id = ?1 AND user_id = ?2 AND used_at IS NULL AND expires_at > ?3
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::auth("Reset link is invalid or has expired"));
        }

        if let Err(err) = write_password_hash(&mut *tx, user_id, password_hash).await {
            tx.rollback().await?;
            return Err(err);
        }

        tx.commit().await?;
        debug!(jti = %jti, user_id = %user_id, "Password reset consumed");
        Ok(())
    }
}

/// Replaces the password hash of an account on the given connection.
///
/// ## Returns
/// * `Err(DbError::NotFound)` if no account has that id
async fn write_password_hash(
    conn: &mut SqliteConnection,
    user_id: &str,
    password_hash: &str,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE users SET password_hash = ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("User", user_id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
